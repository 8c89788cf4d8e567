//! Built-in exam template
//!
//! Used when the application starts without a saved snapshot.

use crate::{ExamDocument, ExamHeader, ExamSettings, Question};

fn mcq(id: &str, text: &str, options: [&str; 4]) -> Question {
    Question::multiple_choice(text, options).with_id(id).with_marks(2)
}

fn short(id: &str, text: &str) -> Question {
    Question::new(text).with_id(id).with_marks(5)
}

fn long(id: &str, text: &str) -> Question {
    Question::new(text).with_id(id).with_marks(15)
}

/// The default chemistry terminal examination
pub fn default_exam() -> ExamDocument {
    ExamDocument {
        header: ExamHeader {
            school_name: "GOVERNMENT BOYS HIGHER SECONDARY SCHOOL HAJI JUNEJO".into(),
            campus: Some("(CAMPUS) TALUKA S.F RAHU DISTRICT BADIN".into()),
            exam_title: "Terminal Examination 2023-24".into(),
            subject: "CHEMISTRY".into(),
            date: "14/12/2023".into(),
            time: "02:00 Hours".into(),
            class_grade: "11th".into(),
            total_marks: 100,
            logo_left: None,
            logo_right: None,
        },
        settings: ExamSettings::default(),
        mcq_instruction: "Tick mark (✓) the correct answer:".into(),
        short_instruction: "Give brief answers to any eight of the following questions:".into(),
        long_instruction: "Write in detailed answers of any two of the following questions:".into(),
        mcqs: vec![
            mcq(
                "m1",
                "If the volume occupied by oxygen gas (O₂) at STP is 44.8dm³, the number of molecules of O₂ in the vessels are:",
                ["3.01 × 10²³", "6.02 × 10²³", "12.04 × 10²³", "24.08 × 10²³"],
            ),
            mcq(
                "m2",
                "Which of the following sample of substances contains the same number of atoms as that of 20g calcium:",
                ["16g S", "20g C", "19g K", "24g Mg"],
            ),
            mcq(
                "m3",
                "Maximum number of molecules present in the following sample of gas:",
                ["100g O₂", "100g CH₄", "100g CO₂", "100g Cl₂"],
            ),
            mcq(
                "m4",
                "For Avogadro's number, this statement is incorrect:",
                [
                    "It is the no. of particles in one mole of any substances",
                    "Its numerical value is 6.02 x 10²³",
                    "Its value changes if number of moles increases",
                    "its value changes if temperature increases.",
                ],
            ),
            mcq(
                "m5",
                "In the reaction 2Na+ 2H₂O → 2NaOH + H₂, if 23g of Na reacts with excess of water, the volume of hydrogen gas (H₂) liberated at STP should be:",
                ["11.2dm³", "22.4dm³", "33.6dm³", "44.8dm³"],
            ),
            mcq(
                "m6",
                "Bohr's theory is not applicable to which of the following species.",
                ["H", "H⁺", "He⁺¹", "Li⁺²"],
            ),
            mcq(
                "m7",
                "The radius of first orbit of hydrogen atom is",
                ["529 Å", "52.9 Å", "5.29 Å", "0.529 Å"],
            ),
            mcq(
                "m8",
                "Line spectrum is used as a tool for the identification of",
                ["Colors", "Electrons", "Elements", "Molecules"],
            ),
            mcq(
                "m9",
                "In 1935 A.D. James Chadwick was awarded Nobel Prize because",
                [
                    "He discovered proton",
                    "He discovered neutron",
                    "He determined the radius of hydrogen atom",
                    "He gave the rules for electronic configuration",
                ],
            ),
            mcq(
                "m10",
                "Which of the following is not an iso electronic pair",
                ["Na+ and Ne", "Na+ and F", "Na and Ca", "Na and Mg+2"],
            ),
        ],
        short_questions: vec![
            short("s1", "Define the following: (a) Molar Volume (b) Exponential Notation"),
            short(
                "s2",
                "Express the following numbers in exponential notation: a. 3652 b. 0.0231 c. 0.0435 d. 0.000072",
            ),
            short(
                "s3",
                "Express the following in simple numbers. a. 3.26 × 10⁻³ b. 1.921 × 10² c. 1.02 × 10⁵",
            ),
            short("s4", "Define sub atomic particles and their characteristics?"),
            short("s5", "Give three properties of each Alpha, Beta and Gamma rays."),
            short("s6", "Discuss some postulates of Bohr’s atomic model theory."),
            short("s7", "Define Bond Energy and Bond Length"),
            short("s8", "Write down the postulate of VSEPR theory?"),
            short("s9", "Explain the Dipole moment with formula."),
            short("s10", "Name five basic shapes by VSEPR theory."),
        ],
        long_questions: vec![
            long("l1", "What are X-rays? How are they produced? Give their properties and uses."),
            long(
                "l2",
                "Write down the electronic configuration of the following. Fe (56/26), C (12/6), N (14/7), Cl (35/17), Ar (40/18)",
            ),
            long(
                "l3",
                "Calculate each of the following quantities. a. Number of moles in 64g of SO₂ b. Mass in grams of 5 moles of ethyne (C₂H₂) c. Number of molecules in 2g water.",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bucket;

    #[test]
    fn test_template_counts() {
        let doc = default_exam();
        assert_eq!(doc.mcqs.len(), 10);
        assert_eq!(doc.short_questions.len(), 10);
        assert_eq!(doc.long_questions.len(), 3);
    }

    #[test]
    fn test_template_marks() {
        let doc = default_exam();
        assert_eq!(doc.bucket_marks(Bucket::MultipleChoice), 20);
        assert_eq!(doc.bucket_marks(Bucket::ShortAnswer), 50);
        assert_eq!(doc.bucket_marks(Bucket::LongAnswer), 45);
        assert_eq!(doc.header.total_marks, 100);
    }

    #[test]
    fn test_template_json_roundtrip() {
        let doc = default_exam();
        let json = serde_json::to_string(&doc).unwrap();
        let loaded: ExamDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, loaded);
    }
}
