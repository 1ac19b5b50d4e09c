//! Prompt templates for report synthesis.
//!
//! Each template embeds the extracted report Markdown and the patient form.
//! Wording is fixed; only the data sections vary.

use super::PatientDetails;

/// Prompt for the narrative clinical summary.
pub fn summary_prompt(report_content: &str, patient: &PatientDetails) -> String {
    format!(
        "Role: You are an expert Medical Data Analyst AI.

Objective: Your task is to synthesize information from three distinct sources (a general medical report, extracted form data, and a table of biomarker metrics) into a single, cohesive narrative summary. This summary should read like a concise clinical overview for a medical professional.

Input Data Format:

You will be provided with the following data:

[MEDICAL REPORT]: A block of text in Markdown format containing the patient's history, reported symptoms, and physician's notes.

[FORM DATA]: A key-value block representing data extracted from a patient information form.

[BIOMARKER TABLE]: A table in Markdown format containing lab results, including the biomarker name, its measured value, units, and the standard reference range.

Your Task:

Analyze and Extract: Carefully read and extract all medically relevant information from all three sources. This includes patient demographics, symptoms, diagnoses, medical history, and all biomarker values.

Synthesize and Summarize: Weave all the extracted information into a single, well-structured paragraph. The summary must be 8-10 lines long. If the amount of data requires more space, you may extend the summary slightly, but do not omit any medical information.

Integrate Biomarkers: For each biomarker in the table, you must state its value. Crucially, compare the value to the provided \"Normal Range\" and explicitly mention if the biomarker is high, low, or within the normal range.

Narrative Flow: The final output should be a fluid narrative, not just a list of facts. Start with the patient's basic demographics and chief complaints, followed by clinical findings and lab results.

[MEDICAL REPORT]:
{report}

[FORM DATA]:
{form}

[BIOMARKER TABLE]:
Please analyze the medical report above and provide a comprehensive medical analysis.
",
        report = report_content,
        form = form_block(patient),
    )
}

/// Prompt for the per-biomarker risk analysis.
pub fn biomarker_risk_prompt(report_content: &str, patient: &PatientDetails) -> String {
    format!(
        "Role: You are an expert AI Health Advisor. Your purpose is to analyze patient medical data and present it in a clear, structured, and actionable format. You are NOT a doctor, and all your advice is for informational purposes and should be reviewed by a qualified medical professional.

Objective: Your task is to process a patient's medical file, which includes a general report, form data, and a table of biomarkers. Based on this information, you will produce a detailed risk analysis report. This report must categorize each biomarker's risk level, provide actionable recommendations for high-risk markers, and explain the potential consequences of inaction.

Input Data Format:

You will receive three pieces of information:

[MEDICAL REPORT]: A narrative report in Markdown containing the physician's notes, patient's symptoms, and preliminary diagnosis.
{report}

[FORM DATA]: Key-value pairs with patient demographic and lifestyle information.
{form}

[BIOMARKER TABLE]: A Markdown table of lab results with columns for the biomarker, its value, unit, and the normal range.
Please analyze the medical report above

Your Task & Output Structure:

You must generate a response organized into the following sections. Do not omit any medical data provided in the input.

1. Biomarker Risk Analysis

Create a detailed table with the following columns:

Biomarker: The name of the lab metric.

Value: The patient's result with its unit.

Normal Range: The standard reference range.

Risk Level: Categorize the result into one of three levels:

Safe: The value is within the normal range.

Mid-Risk: The value is borderline or slightly outside the normal range, warranting monitoring.

Not Safe (High Risk): The value is significantly outside the normal range and requires attention.

Recommendations (for Not Safe / High Risk): If a biomarker is \"Not Safe,\" provide clear, actionable advice. This should include lifestyle changes (diet, exercise) and a strong recommendation to consult their doctor for a treatment plan. For \"Safe\" or \"Mid-Risk,\" you can state \"Continue monitoring\" or \"Maintain healthy lifestyle.\"

Potential Consequences (if ignored): For each \"Not Safe\" biomarker, explain the potential health problems or diseases that could develop if the issue is not addressed.

2. Important Disclaimer

Conclude your entire response with the following mandatory disclaimer to ensure user safety.
",
        report = report_content,
        form = form_block(patient),
    )
}

/// Prompt for a follow-up question about an existing summary.
pub fn chat_prompt(summary: &str, question: &str) -> String {
    format!(
        "You are a professional medical assistant AI. Your task is to carefully analyze patient details and answer medical questions accurately and clearly, using evidence-based reasoning.
Patient Details: {summary}
Patient Question: {question}

Instructions:
- Provide clear, concise answers.
- If uncertain, indicate that more tests or doctor consultation is needed.
- Do not give personal medical diagnosis; only provide guidance or explanations.
- Use simple language understandable by a patient or caregiver.

Answer:"
    )
}

fn form_block(patient: &PatientDetails) -> String {
    format!(
        "Age: {}\nGender: {}\nWeight: {}kg\nRecent Symptoms: {}",
        patient.age, patient.gender, patient.weight, patient.symptoms
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientDetails {
        PatientDetails::new("54", "female", "71", "fatigue, thirst")
    }

    #[test]
    fn test_summary_prompt_embeds_inputs() {
        let prompt = summary_prompt("| HbA1c | 7.2 % |", &patient());

        assert!(prompt.starts_with("Role: You are an expert Medical Data Analyst AI."));
        assert!(prompt.contains("[MEDICAL REPORT]:\n| HbA1c | 7.2 % |\n"));
        assert!(prompt.contains(
            "Age: 54\nGender: female\nWeight: 71kg\nRecent Symptoms: fatigue, thirst"
        ));
        assert!(!prompt.contains('$'));
    }

    #[test]
    fn test_biomarker_prompt_sections() {
        let prompt = biomarker_risk_prompt("report", &patient());

        assert!(prompt.contains("1. Biomarker Risk Analysis"));
        assert!(prompt.contains("2. Important Disclaimer"));
        assert!(prompt.contains("preliminary diagnosis.\nreport\n"));
        assert!(prompt.contains("Weight: 71kg"));
    }

    #[test]
    fn test_chat_prompt() {
        let prompt = chat_prompt("Elevated LDL.", "Should I change my diet?");

        assert!(prompt.contains("Patient Details: Elevated LDL.\n"));
        assert!(prompt.contains("Patient Question: Should I change my diet?\n"));
        assert!(prompt.ends_with("Answer:"));
    }
}
