//! Prompt builders for the editor.

use crate::practices::guidelines;

pub const IMPROVED_CONTENT_MARKER: &str = "---IMPROVED CONTENT---";
pub const SUGGESTIONS_MARKER: &str = "---SUGGESTIONS---";
pub const CLARIFICATION_MARKER: &str = "---AREAS FOR CLARIFICATION---";

const NO_CRITIQUE: &str = "No specific critique was given. Take a different approach.";

/// First-pass analysis of retrieved content.
pub fn analysis(query: &str, context: &str) -> String {
    format!(
        "You are an expert RFP (Request for Proposal) editor and consultant. Your task is to \
         analyze the given content and provide improvements based on RFP best practices.\n\n\
         {guidelines}\n\
         USER QUERY: {query}\n\n\
         CONTEXT FROM DOCUMENTS:\n{context}\n\n\
         Please analyze the content and provide:\n\
         1. An improved version that follows RFP best practices\n\
         2. Specific suggestions for enhancement\n\
         3. Areas that need clarification or additional detail\n\
         4. Recommendations for better structure and clarity\n\n\
         Format your response as:\n\
         {IMPROVED_CONTENT_MARKER}\n[Your improved version here]\n\n\
         {SUGGESTIONS_MARKER}\n[List of specific improvements made]\n\n\
         {CLARIFICATION_MARKER}\n[What needs more detail or clarification]\n",
        guidelines = guidelines(),
    )
}

/// Revision after the user rejected `previous`.
pub fn rephrase(query: &str, context: &str, previous: &str, critique: Option<&str>) -> String {
    let critique = critique.map(str::trim).filter(|c| !c.is_empty()).unwrap_or(NO_CRITIQUE);
    format!(
        "The user rejected your previous suggestion. Please provide an improved version.\n\n\
         ORIGINAL QUERY: {query}\n\
         CONTEXT: {context}\n\
         YOUR PREVIOUS SUGGESTION: {previous}\n\
         USER FEEDBACK: {critique}\n\n\
         {guidelines}\n\
         Please provide a new suggestion that addresses the user's feedback while maintaining \
         RFP best practices.\n",
        guidelines = guidelines(),
    )
}

/// Plain question answering over retrieved context.
pub fn answer(query: &str, context: &str) -> String {
    format!("Answer the question using the context below.\n\nContext:\n{context}\n\nQuestion: {query}")
}
