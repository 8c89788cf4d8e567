//! Pagination of atomic flow blocks
//!
//! Blocks are never split. A block with `keep_with_next` is moved to a new
//! page together with the block that follows it when the pair does not fit.
//! A block taller than an empty page is force-placed and the page is marked
//! as overflowing.

use crate::{PageConfig, PageDecorations, PlanBlock, PlanPage, Rect};

/// Assigns flow blocks to pages
pub struct Paginator {
    config: PageConfig,
}

impl Paginator {
    /// Create a new paginator with the given configuration
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    /// Get the page configuration
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Full page rectangle
    pub fn page_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.page_width(), self.config.page_height())
    }

    /// Content rectangle inside the margins
    pub fn content_area(&self) -> Rect {
        Rect::new(
            self.config.margin_left,
            self.config.margin_top,
            self.config.content_width(),
            self.config.content_height(),
        )
    }

    /// Paginate blocks in flow order.
    ///
    /// ```text
    /// for each block:
    ///     required = block height + height of its keep_with_next chain
    ///     if page is empty, or required fits, or previous block keeps with it:
    ///         place block
    ///     else:
    ///         start new page and re-evaluate
    /// ```
    ///
    /// Always yields at least one page.
    pub fn paginate(&self, blocks: Vec<PlanBlock>, decorations: &PageDecorations) -> Vec<PlanPage> {
        let content_height = self.config.content_height();
        let mut pages = Vec::new();
        let mut current_page_blocks: Vec<PlanBlock> = Vec::new();
        let mut current_y = 0.0;
        let mut held_by_previous = false;

        let mut blocks: Vec<Option<PlanBlock>> = blocks.into_iter().map(Some).collect();
        let mut block_index = 0;
        while block_index < blocks.len() {
            let (height, keep_with_next) = match &blocks[block_index] {
                Some(block) => (block.height(), block.keep_with_next),
                None => {
                    block_index += 1;
                    continue;
                }
            };

            let chain_height = Self::keep_with_next_chain_height(&blocks, block_index);
            let remaining_height = content_height - current_y;
            let fits = height + chain_height <= remaining_height;

            if current_page_blocks.is_empty() || fits || held_by_previous {
                if let Some(mut block) = blocks[block_index].take() {
                    block.bounds.x = self.config.margin_left;
                    block.bounds.y = self.config.margin_top + current_y;
                    current_y += height;
                    current_page_blocks.push(block);
                }
                held_by_previous = keep_with_next;
                block_index += 1;
            } else {
                pages.push(self.create_page(pages.len(), current_page_blocks, current_y, decorations));
                current_page_blocks = Vec::new();
                current_y = 0.0;
            }
        }

        if !current_page_blocks.is_empty() || pages.is_empty() {
            pages.push(self.create_page(pages.len(), current_page_blocks, current_y, decorations));
        }

        pages
    }

    /// Height of the blocks that must follow `start_index` onto its page
    fn keep_with_next_chain_height(blocks: &[Option<PlanBlock>], start_index: usize) -> f32 {
        let mut height = 0.0;
        let mut index = start_index;
        while let Some(Some(block)) = blocks.get(index) {
            if !block.keep_with_next {
                break;
            }
            match blocks.get(index + 1) {
                Some(Some(next)) => height += next.height(),
                _ => break,
            }
            index += 1;
        }
        height
    }

    fn create_page(
        &self,
        index: usize,
        blocks: Vec<PlanBlock>,
        used_height: f32,
        decorations: &PageDecorations,
    ) -> PlanPage {
        PlanPage {
            index,
            bounds: self.page_bounds(),
            content_area: self.content_area(),
            blocks,
            decorations: decorations.clone(),
            overflows: used_height > self.config.content_height(),
        }
    }
}
