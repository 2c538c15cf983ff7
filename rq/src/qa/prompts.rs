//! QA prompt templates
//!
//! Templates are Handlebars, embedded in the binary, and rendered with
//! escaping disabled (chunk content is code, not HTML). Three call
//! kinds exist: summarize-chunk and read-summary for the incremental
//! path, direct-qa for the single-call path.

use handlebars::{Handlebars, no_escape};
use serde::Serialize;

use super::QaError;

/// Sentinel carried as the running summary before any chunk is processed
pub const NO_SUMMARY_SENTINEL: &str = "[No summary yet - this is the first chunk]";

/// Update the running summary with one chunk
const SUMMARIZE_CHUNK: &str = "\
You are scanning the contents of a large file from a GitHub repository located at \
the path {{source_path}}. You are analyzing the file chunk by chunk in order to \
answer the question '{{question}}'. You have created the following running summary \
from the previous chunks:

<summary>
{{summary}}
</summary>

Update this summary using information from the chunk provided below. Only include \
information relevant to the question. Respond with only the resulting summary. If \
the chunk contains no relevant information, respond with only the unmodified summary.

<chunk>
{{chunk}}
</chunk>
";

/// Answer the question from the accumulated summary
const READ_SUMMARY: &str = "\
You are scanning the contents of a large file from a GitHub repository located at \
the path {{source_path}}. You scanned the file chunk by chunk, summarizing each \
chunk for information to answer the question '{{question}}'. A summary of the \
information from these chunks is given below. Using this summary, answer the \
provided question. If the summary does not contain information relevant to the \
question, reply that there is not enough information in the file to provide an \
answer.

<summary>
{{summary}}
</summary>
";

/// Answer the question from the whole file content in one call
const DIRECT_QA: &str = "\
You are scanning the contents of a file from a GitHub repository located at the \
path {{source_path}}. You are trying to answer the question '{{question}}'. Use \
only the provided content below. If the content does not contain any information \
relevant to the question, reply that there is not enough information in the file \
to provide an answer.

content:

{{content}}
";

#[derive(Serialize)]
struct SummarizeChunkContext<'a> {
    source_path: &'a str,
    question: &'a str,
    chunk: &'a str,
    summary: &'a str,
}

#[derive(Serialize)]
struct ReadSummaryContext<'a> {
    source_path: &'a str,
    question: &'a str,
    summary: &'a str,
}

#[derive(Serialize)]
struct DirectQaContext<'a> {
    source_path: &'a str,
    question: &'a str,
    content: &'a str,
}

/// Renders the embedded QA templates
pub struct QaPrompts {
    hbs: Handlebars<'static>,
}

impl QaPrompts {
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(no_escape);
        Self { hbs }
    }

    /// Render the summarize-chunk prompt
    pub fn summarize_chunk(
        &self,
        source_path: &str,
        question: &str,
        chunk: &str,
        summary: &str,
    ) -> Result<String, QaError> {
        let ctx = SummarizeChunkContext {
            source_path,
            question,
            chunk,
            summary,
        };
        Ok(self.hbs.render_template(SUMMARIZE_CHUNK, &ctx)?)
    }

    /// Render the final answer-from-summary prompt
    pub fn read_summary(&self, source_path: &str, question: &str, summary: &str) -> Result<String, QaError> {
        let ctx = ReadSummaryContext {
            source_path,
            question,
            summary,
        };
        Ok(self.hbs.render_template(READ_SUMMARY, &ctx)?)
    }

    /// Render the direct single-call QA prompt
    pub fn direct_qa(&self, source_path: &str, question: &str, content: &str) -> Result<String, QaError> {
        let ctx = DirectQaContext {
            source_path,
            question,
            content,
        };
        Ok(self.hbs.render_template(DIRECT_QA, &ctx)?)
    }
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_chunk_fills_all_variables() {
        let prompts = QaPrompts::new();
        let rendered = prompts
            .summarize_chunk("src/lib.rs", "what is exported?", "pub fn foo() {}", NO_SUMMARY_SENTINEL)
            .unwrap();

        assert!(rendered.contains("src/lib.rs"));
        assert!(rendered.contains("what is exported?"));
        assert!(rendered.contains("pub fn foo() {}"));
        assert!(rendered.contains(NO_SUMMARY_SENTINEL));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_read_summary_fills_all_variables() {
        let prompts = QaPrompts::new();
        let rendered = prompts
            .read_summary("Makefile", "how do I build?", "the file defines a build target")
            .unwrap();

        assert!(rendered.contains("Makefile"));
        assert!(rendered.contains("how do I build?"));
        assert!(rendered.contains("the file defines a build target"));
    }

    #[test]
    fn test_content_is_not_html_escaped() {
        let prompts = QaPrompts::new();
        let rendered = prompts
            .direct_qa("unknown", "q", "if a < b && c > d { \"quote\" }")
            .unwrap();

        assert!(rendered.contains("if a < b && c > d { \"quote\" }"));
        assert!(!rendered.contains("&lt;"));
        assert!(!rendered.contains("&amp;"));
    }
}
