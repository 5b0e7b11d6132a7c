//! Synthesis prompt assembly.

use concierge_core::models::RetrievedChunk;
use concierge_core::Intent;

pub const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a helpful assistant explaining marketplace policies and features.

Rules:
1. Answer ONLY from the provided context.
2. Do not add information that is not in the context.
3. Do not make up policies or procedures.
4. Cite sources using [Source N] markers.
5. If the context is insufficient, say \"I don't have enough information\".
6. Be clear and concise.";

/// Numbered context block: `[Source N]` per chunk, best first.
pub fn build_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[Source {}]\n{}\n", i + 1, chunk.text))
        .collect::<Vec<_>>()
        .join("\n---\n")
}

pub fn synthesis_prompt(intent: Intent, query: &str, context: &str) -> String {
    format!(
        "Intent: {intent}\nUser Query: {query}\n\nContext:\n{context}\n\n\
         Provide a clear, helpful answer based ONLY on the context above."
    )
}
