//! Prompt builders for the evaluation tasks.
//!
//! Each builder renders the reference material and the candidate
//! response into the examiner prompt for that task, ending with the
//! strict-JSON response contract that [`Verdict`](super::Verdict)
//! parses. Prompt text is data; no logic lives here beyond truncating
//! the token analysis for the compare task.

use crate::align::AlignmentEntry;

/// Max alignment rows embedded in the compare prompt; full reports for
/// long passages would crowd out the instructions.
pub const ANALYSIS_PREVIEW_LIMIT: usize = 50;

/// System prompt for spoken read-aloud / repeat comparison.
pub const COMPARE_SYSTEM: &str = "You are a precise English speaking examiner.";

/// System prompt for lecture retelling.
pub const RETELL_SYSTEM: &str = "You are a fair and constructive English speech examiner.";

/// System prompt for spoken short answers.
pub const SHORT_ANSWER_SYSTEM: &str = "You are a precise and fair evaluator for spoken answers.";

/// System prompt for written summaries.
pub const SUMMARY_SYSTEM: &str = "You are a fair and constructive English writing evaluator.";

/// System prompt for essays.
pub const ESSAY_SYSTEM: &str = "You are a fair and constructive essay evaluator.";

/// Examiner prompt comparing a transcript against reference text,
/// with a truncated rendering of the token alignment.
pub fn compare(reference: &str, transcript: &str, analysis: &[AlignmentEntry]) -> String {
    let preview = &analysis[..analysis.len().min(ANALYSIS_PREVIEW_LIMIT)];
    let preview_json =
        serde_json::to_string(preview).unwrap_or_else(|_| "[]".to_owned());
    format!(
        r#"You are an English speaking examiner.
Compare the reference and the transcription.

Reference: "{reference}"
Transcription: "{transcript}"

Token diff summary:
{preview_json}

Return STRICT JSON with this structure:
{{
  "scores": {{
    "Content": [0-100],
    "Fluency": [0-100],
    "Pronunciation": [0-100]
  }},
  "feedback": [
    "positive comment 1",
    "positive comment 2",
    "positive comment 3"
  ],
  "improvements": [
    "improvement tip 1",
    "improvement tip 2"
  ]
}}
Only return valid JSON."#
    )
}

/// Examiner prompt for a spoken retelling of a lecture.
pub fn retell(reference: &str, transcript: &str) -> String {
    format!(
        r#"You are an English-speaking examiner evaluating a student's spoken retelling of a lecture.
### Lecture Summary:
"{reference}"
### Student's Retelling (Transcribed):
"{transcript}"
Evaluate according to:
1. **Content (0-100)** - How well the retelling matches the meaning and details of the lecture.
2. **Fluency (0-100)** - Smoothness, coherence, and language flow.
3. **Pronunciation (0-100)** - Clarity and naturalness of speech (approximate via transcription).

Provide:
- Numeric scores (0-100) for each category.
- A short feedback message for each area.
- Three improvement suggestions.
- A short overall summary.

Respond ONLY in JSON, exactly as shown below:

{{
    "scores": {{
        "Content": <0-100>,
        "Fluency": <0-100>,
        "Pronunciation": <0-100>
    }},
    "feedback": {{
        "Content": "<feedback>",
        "Fluency": "<feedback>",
        "Pronunciation": "<feedback>"
    }},
    "improvements": [
        "<suggestion 1>",
        "<suggestion 2>",
        "<suggestion 3>"
    ],
    "overallSummary": "<brief summary>"
}}"#
    )
}

/// Examiner prompt checking whether a spoken answer addresses a question.
pub fn short_answer(question: &str, answer: &str) -> String {
    format!(
        r#"You are an intelligent evaluator. Analyze whether the user's spoken response correctly answers the question.

### Question:
"{question}"

### Transcribed Answer:
"{answer}"

Evaluate the answer on:
- **Relevance (0-100)**: Does the answer address the question meaningfully?
- **Accuracy (0-100)**: Is the answer factually and logically correct?
- **Completeness (0-100)**: Does it cover key points expected in a good answer?

Respond ONLY in the following JSON format:

{{
    "scores": {{
        "Relevance": <0-100>,
        "Accuracy": <0-100>,
        "Completeness": <0-100>
    }},
    "is_answer_correct": true/false,
    "feedback": "<brief feedback>",
    "improvements": [
        "<suggestion 1>",
        "<suggestion 2>",
        "<suggestion 3>"
    ],
    "overallSummary": "<short summary>"
}}"#
    )
}

/// Examiner prompt for a written summary of a source text.
pub fn summary(original_text: &str, student_summary: &str) -> String {
    format!(
        r#"You are an expert English writing evaluator.
Evaluate the student's summary against the original text.

### Original Text:
"{original_text}"

### Student's Summary:
"{student_summary}"

Important rule:
- Do NOT reward summaries that copy sentences or maintain the same word order as the original.
- Reward paraphrasing, summarization skill, and clarity in the student's own words.

Evaluate on these criteria:
1. **Content (0-100)** - Accuracy, relevance, and coverage of key ideas.
2. **Fluency (0-100)** - Grammar, clarity, sentence flow, and coherence.

Provide JSON in the following exact format:

{{
    "scores": {{
        "Content": <0-100>,
        "Fluency": <0-100>
    }},
    "feedback": {{
        "Content": "<feedback>",
        "Fluency": "<feedback>"
    }},
    "improvements": [
        "<suggestion 1>",
        "<suggestion 2>",
        "<suggestion 3>"
    ],
    "overallSummary": "<brief overall evaluation>"
}}"#
    )
}

/// Examiner prompt for an essay written to a question prompt.
pub fn essay(question: &str, student_essay: &str) -> String {
    format!(
        r#"You are an expert English writing examiner.
Evaluate the student's essay based on the given question.

### Question:
"{question}"

### Student's Essay:
"{student_essay}"

You must evaluate on the following criteria (each scored 0-100):

1. **Relevance** - How well the essay addresses the question.
2. **Coherence** - Logical flow, structure, and clarity of ideas.
3. **Grammar** - Grammar, punctuation, and sentence construction.
4. **Creativity** - Originality, tone, and engagement.

Do not reward essays that merely copy or restate the question.

Provide JSON in the following format exactly:

{{
    "scores": {{
        "Relevance": <0-100>,
        "Coherence": <0-100>,
        "Grammar": <0-100>,
        "Creativity": <0-100>
    }},
    "feedback": {{
        "Relevance": "<feedback>",
        "Coherence": "<feedback>",
        "Grammar": "<feedback>",
        "Creativity": "<feedback>"
    }},
    "improvements": [
        "<suggestion 1>",
        "<suggestion 2>",
        "<suggestion 3>"
    ],
    "overallSummary": "<brief overall evaluation>"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::analyze;

    #[test]
    fn compare_embeds_reference_and_transcript() {
        let report = analyze("the quick brown fox", "the quick brown foxes");
        let prompt = compare("the quick brown fox", "the quick brown foxes", &report.analysis);
        assert!(prompt.contains("the quick brown fox"));
        assert!(prompt.contains("\"status\":\"substitution\""));
        assert!(prompt.contains("Only return valid JSON"));
    }

    #[test]
    fn compare_truncates_long_analyses() {
        let long: Vec<String> = (0..120).map(|i| format!("w{i}")).collect();
        let reference = long.join(" ");
        let report = analyze(&reference, "");
        assert_eq!(report.analysis.len(), 120);
        let prompt = compare(&reference, "", &report.analysis);
        // the last rows must not be rendered
        assert!(!prompt.contains("\"w119\""));
        assert!(prompt.contains("\"w10\""));
    }

    #[test]
    fn task_prompts_name_their_categories() {
        assert!(retell("ref", "said").contains("Pronunciation"));
        assert!(short_answer("q", "a").contains("is_answer_correct"));
        assert!(summary("orig", "sum").contains("paraphrasing"));
        assert!(essay("q", "text").contains("Creativity"));
    }
}
