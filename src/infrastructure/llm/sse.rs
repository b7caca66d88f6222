use serde::Deserialize;

/// What a single `data:` line of a chat-completions stream carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsePayload {
    Token(String),
    Done,
    Skip,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl SsePayload {
    /// Comments, blank lines, role-only deltas and unparseable payloads are
    /// all `Skip`.
    pub fn parse(line: &str) -> Self {
        let Some(data) = line.strip_prefix("data:") else {
            return SsePayload::Skip;
        };
        let data = data.trim();

        if data == "[DONE]" {
            return SsePayload::Done;
        }

        serde_json::from_str::<ChatCompletionChunk>(data)
            .ok()
            .and_then(|chunk| chunk.choices.into_iter().next())
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(SsePayload::Token)
            .unwrap_or(SsePayload::Skip)
    }
}

/// Reassembles complete lines from arbitrarily split byte chunks. Bytes are
/// only decoded once a full line is available so multi-byte characters split
/// across chunks survive.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line);
            lines.push(text.trim_end_matches(['\r', '\n']).to_string());
        }
        lines
    }
}
