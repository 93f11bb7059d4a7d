// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use smallvec::SmallVec;

use super::CommandError;
use crate::model::Vec3;

/// Arguments of one command line: everything after the command name.
///
/// Most commands take space-separated tokens with comma-separated lists inside them. JSON
/// payloads and file paths may contain spaces and are read from [`Args::rest`] instead.
#[derive(Debug, Clone)]
pub struct Args<'a> {
    command: &'static str,
    rest: &'a str,
    tokens: SmallVec<[&'a str; 6]>,
}

impl<'a> Args<'a> {
    pub fn new(command: &'static str, rest: &'a str) -> Self {
        let rest = rest.trim();
        Self {
            command,
            rest,
            tokens: rest.split_whitespace().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn missing(&self, name: &'static str) -> CommandError {
        CommandError::MissingArgument {
            command: self.command,
            name,
        }
    }

    /// The whole argument text, spaces included.
    pub fn rest(&self, name: &'static str) -> Result<&'a str, CommandError> {
        if self.rest.is_empty() {
            return Err(self.missing(name));
        }
        Ok(self.rest)
    }

    pub fn token(&self, index: usize, name: &'static str) -> Result<&'a str, CommandError> {
        self.tokens.get(index).copied().ok_or_else(|| self.missing(name))
    }

    pub fn list(&self, index: usize, name: &'static str) -> Result<Vec<String>, CommandError> {
        Ok(split_list(self.token(index, name)?))
    }

    /// A list that may be left out; absent means empty.
    pub fn optional_list(&self, index: usize) -> Vec<String> {
        self.tokens.get(index).map(|raw| split_list(raw)).unwrap_or_default()
    }

    pub fn number(&self, index: usize, name: &'static str) -> Result<f64, CommandError> {
        let raw = self.token(index, name)?;
        parse_number(self.command, name, raw)
    }

    /// `x,y,z`.
    pub fn vec3(&self, index: usize, name: &'static str) -> Result<Vec3, CommandError> {
        let raw = self.token(index, name)?;
        let parts: Vec<&str> = raw.split(',').collect();
        let [x, y, z] = parts.as_slice() else {
            return Err(CommandError::WrongArity {
                command: self.command,
                name,
                expected: 3,
                found: parts.len(),
            });
        };
        Ok(Vec3::new(
            parse_number(self.command, name, x)?,
            parse_number(self.command, name, y)?,
            parse_number(self.command, name, z)?,
        ))
    }

    fn json_error(&self, source: serde_json::Error) -> CommandError {
        CommandError::Json {
            command: self.command,
            source,
        }
    }

    /// Deserializes the whole argument text as JSON.
    pub fn json<T: DeserializeOwned>(&self, name: &'static str) -> Result<T, CommandError> {
        serde_json::from_str(self.rest(name)?).map_err(|source| self.json_error(source))
    }

    /// A JSON object as `(key, value)` pairs in the order they were written.
    pub fn json_entries<T: DeserializeOwned>(
        &self,
        name: &'static str,
    ) -> Result<Vec<(String, T)>, CommandError> {
        let object: Map<String, Value> = self.json(name)?;
        object
            .into_iter()
            .map(|(key, value)| {
                let value = serde_json::from_value(value).map_err(|e| self.json_error(e))?;
                Ok((key, value))
            })
            .collect()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_owned).collect()
}

fn parse_number(command: &'static str, name: &'static str, raw: &str) -> Result<f64, CommandError> {
    let value: f64 = raw.trim().parse().map_err(|_| CommandError::InvalidNumber {
        command,
        name,
        value: raw.to_owned(),
    })?;
    if !value.is_finite() {
        return Err(CommandError::InvalidNumber {
            command,
            name,
            value: raw.to_owned(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::Args;
    use crate::model::Vec3;
    use crate::protocol::CommandError;

    #[test]
    fn tokens_lists_and_vectors() {
        let args = Args::new("translate", " 1,2.5,-3  a#1,b ");
        assert_eq!(
            args.vec3(0, "value").expect("vec"),
            Vec3::new(1.0, 2.5, -3.0)
        );
        assert_eq!(args.list(1, "names").expect("names"), vec!["a#1", "b"]);
        assert!(args.optional_list(2).is_empty());
    }

    #[test]
    fn json_entries_follow_the_written_order() {
        let args = Args::new("add_objects", r#"{"b": 1, "a": 2, "c": 3}"#);
        let entries: Vec<(String, u32)> = args.json_entries("objects").expect("entries");
        let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(entries[1].1, 2);

        let err = args.json_entries::<String>("objects").expect_err("numbers are not strings");
        assert!(matches!(
            err,
            CommandError::Json { command: "add_objects", .. }
        ));
    }

    #[test]
    fn rest_keeps_spaces() {
        let args = Args::new("open_file", "C:/My Scenes/room.ma");
        assert_eq!(args.rest("path").expect("path"), "C:/My Scenes/room.ma");
    }

    #[test]
    fn errors_name_the_argument() {
        let args = Args::new("raytrace", "far");
        assert!(matches!(
            args.number(0, "distance"),
            Err(CommandError::InvalidNumber { name: "distance", .. })
        ));
        assert!(matches!(
            args.token(1, "name"),
            Err(CommandError::MissingArgument {
                command: "raytrace",
                name: "name"
            })
        ));
        assert!(matches!(
            Args::new("translate", "1,2").vec3(0, "value"),
            Err(CommandError::WrongArity { expected: 3, found: 2, .. })
        ));
        assert!(matches!(
            Args::new("x", "inf").number(0, "n"),
            Err(CommandError::InvalidNumber { .. })
        ));
    }
}
