//! The wealth-management client profile questionnaire.

use intake_types::{Catalog, CatalogError, Question, QuestionId};

/// Id of the multi-select source-of-funds question.
pub const SOURCE_OF_FUNDS: &str = "Q15";

/// Id of the optional free-text question that collects advisor notes.
pub const ADVISOR_NOTES: &str = "Q16";

/// OTHER marker of the source-of-funds question.
pub const OTHER_MARKER: &str = "other";

fn graded(id: &str, prompt: &str, section: u32, labels: [&str; 4]) -> Question {
    ["A", "B", "C", "D"]
        .into_iter()
        .zip(labels)
        .fold(Question::single(id, prompt, section), |q, (code, label)| {
            q.with_option(code, label)
        })
}

/// Build the sixteen-question client profile.
pub fn wealth_catalog() -> Result<Catalog, CatalogError> {
    let questions = vec![
        graded(
            "Q1",
            "What is your annual income band?",
            1,
            [
                "Below ₦5m per year",
                "₦5m–₦20m",
                "₦20m–₦40m",
                "Above ₦40m",
            ],
        ),
        graded(
            "Q2",
            "Which stage best describes your financial life?",
            1,
            [
                "Building stability and structure",
                "Growing income & long-term plans",
                "Expanding wealth & planning legacy",
                "Managing multi-generational wealth",
            ],
        ),
        graded(
            "Q3",
            "What is your investment horizon?",
            1,
            ["Less than 1 year", "1–3 years", "3–5 years", "5+ years"],
        ),
        graded(
            "Q4",
            "How much do you hold in cash and investments?",
            1,
            [
                "Below ₦5m",
                "₦5m–₦50m",
                "₦50m–₦100m",
                "Above ₦100m–₦500m+",
            ],
        ),
        graded(
            "Q5",
            "What is the value of your real estate or land?",
            1,
            [
                "None",
                "Below ₦25m",
                "₦25m–₦250m",
                "Above ₦250m–₦500m+",
            ],
        ),
        graded(
            "Q6",
            "What is the value of your business or income-producing assets?",
            1,
            [
                "Not applicable",
                "Below ₦25m",
                "₦25m–₦250m",
                "Above ₦250m–₦500m+",
            ],
        ),
        graded(
            "Q7",
            "How large are your debts and obligations?",
            1,
            [
                "None",
                "Below ₦25m",
                "₦25m–₦250m",
                "Above ₦250m–₦500m+",
            ],
        ),
        graded(
            "Q8",
            "What is your primary financial goal?",
            2,
            [
                "Safety and liquidity",
                "Steady growth",
                "Aggressive long-term growth",
                "Legacy building",
            ],
        ),
        graded(
            "Q9",
            "What would you do if markets fell sharply?",
            2,
            [
                "Buy more",
                "Stay invested",
                "Reduce exposure",
                "Exit immediately",
            ],
        ),
        graded(
            "Q10",
            "How comfortable are you with volatility?",
            2,
            [
                "Very comfortable",
                "Moderately comfortable",
                "Slightly uncomfortable",
                "Not comfortable at all",
            ],
        ),
        graded(
            "Q11",
            "What loss could you tolerate in a single year?",
            2,
            ["0% (No loss)", "Up to 5%", "Up to 10%", "Above 10%"],
        ),
        graded(
            "Q12",
            "How strong is your financial buffer?",
            2,
            [
                "Limited buffer",
                "Moderate buffer",
                "Strong buffer",
                "Very strong buffer",
            ],
        ),
        graded(
            "Q13",
            "How much investment experience do you have?",
            2,
            ["None", "Beginner", "Moderate", "Experienced"],
        ),
        graded(
            "Q14",
            "When might you need access to these funds?",
            2,
            [
                "Anytime",
                "Within 6 months",
                "1–3 years",
                "No immediate need",
            ],
        ),
        Question::multi(SOURCE_OF_FUNDS, "Where do your funds come from?", 3)
            .with_option("salary", "Salary")
            .with_option("business", "Business income")
            .with_option("investments", "Investments")
            .with_option("rental", "Rental income")
            .with_other(OTHER_MARKER, "Other (free text)"),
        Question::text(
            ADVISOR_NOTES,
            "Anything else your advisor should know?",
            3,
        )
        .optional(),
    ];

    Ok(Catalog::new(questions)?
        .with_prelude("Tell us about yourself so we can build your wealth profile.")
        .with_section_title(1, "Financial position")
        .with_section_title(2, "Goals and risk")
        .with_section_title(3, "Funds and notes")
        .with_epilogue("Thank you. Your answers are being analysed."))
}

/// The commentary target used by the OTHER-extraction normalizer.
pub fn advisor_notes_id() -> QuestionId {
    QuestionId::new(ADVISOR_NOTES)
}

#[cfg(test)]
mod tests {
    use intake_types::Multiplicity;

    use super::*;

    #[test]
    fn catalog_is_valid() {
        let catalog = wealth_catalog().unwrap();
        assert_eq!(catalog.question_count(), 16);
        assert_eq!(catalog.section_of(15).number, 3);
        assert_eq!(catalog.questions_in_section(1).len(), 7);
        assert_eq!(catalog.questions_in_section(2).len(), 7);
        assert_eq!(catalog.questions_in_section(3).len(), 2);
    }

    #[test]
    fn graded_questions_use_four_codes() {
        let catalog = wealth_catalog().unwrap();
        for question in &catalog.questions()[..14] {
            assert_eq!(question.multiplicity(), Multiplicity::Single);
            let codes: Vec<_> = question.options().iter().map(|o| o.value.as_str()).collect();
            assert_eq!(codes, ["A", "B", "C", "D"], "{}", question.id());
        }
    }

    #[test]
    fn source_of_funds_has_other() {
        let catalog = wealth_catalog().unwrap();
        let q15 = catalog.question(&SOURCE_OF_FUNDS.into()).unwrap();
        assert_eq!(q15.multiplicity(), Multiplicity::Multi);
        assert_eq!(q15.other_marker(), Some(OTHER_MARKER));
        assert_eq!(q15.options().len(), 5);

        let notes = catalog.question(&advisor_notes_id()).unwrap();
        assert!(notes.is_optional());
        assert_eq!(notes.multiplicity(), Multiplicity::Text);
    }
}
