// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use thiserror::Error;

/// A peer sent more than the line limit without a newline.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("command line exceeds {limit} bytes")]
pub struct FrameTooLong {
    pub limit: usize,
}

/// Splits a byte stream into newline-terminated payloads.
///
/// Payloads are decoded lossily as UTF-8, a trailing `\r` is dropped, and blank lines are
/// skipped. Bytes after the last newline stay buffered until more data or end of stream, up to
/// `max_line` bytes per line.
#[derive(Debug)]
pub struct LineFramer {
    pending: Vec<u8>,
    max_line: usize,
}

fn payload(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let text = String::from_utf8_lossy(raw);
    if text.trim().is_empty() {
        return None;
    }
    Some(text.into_owned())
}

impl LineFramer {
    pub fn new(max_line: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line,
        }
    }

    /// Appends `chunk` and returns every payload it completed.
    ///
    /// Fails once a line, finished or not, grows past the limit; the framer should then be
    /// dropped along with its connection.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, FrameTooLong> {
        let too_long = FrameTooLong {
            limit: self.max_line,
        };
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        let mut start = 0;
        for end in memchr::memchr_iter(b'\n', &self.pending) {
            if end - start > self.max_line {
                return Err(too_long);
            }
            lines.extend(payload(&self.pending[start..end]));
            start = end + 1;
        }
        self.pending.drain(..start);
        if self.pending.len() > self.max_line {
            return Err(too_long);
        }
        Ok(lines)
    }

    /// The unterminated remainder at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        payload(&rest)
    }

    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}
