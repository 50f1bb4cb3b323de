// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fmt;

pub const TEXT_EXTENSIONS: [&str; 2] = [".txt", ".md"];
pub const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// The three document families the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Text,
    Markdown,
    Image,
}

impl DocumentKind {
    pub fn from_filename(name: &str) -> Option<Self> {
        match extension(name).as_str() {
            ".txt" => Some(DocumentKind::Text),
            ".md" => Some(DocumentKind::Markdown),
            ".jpg" | ".jpeg" | ".png" => Some(DocumentKind::Image),
            _ => None,
        }
    }

    pub fn is_editable(self) -> bool {
        matches!(self, DocumentKind::Text | DocumentKind::Markdown)
    }

    pub fn content_type(self, name: &str) -> String {
        match self {
            DocumentKind::Text => "text/plain; charset=utf-8".to_string(),
            DocumentKind::Markdown => "text/html; charset=utf-8".to_string(),
            DocumentKind::Image => crate::util::image_content_type(name),
        }
    }
}

/// What a name is being validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameUse<'a> {
    Create,
    Rename(DocumentKind),
    Upload,
    Field(&'a str),
}

impl NameUse<'_> {
    fn label(&self) -> &str {
        match self {
            NameUse::Field(label) => label,
            _ => "name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    Required(String),
    SpecialCharacters(String),
    NotTextFile,
    NotImageFile,
    UnsupportedUpload,
    InUse,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Required(label) => write!(f, "A {} is required", label),
            NameError::SpecialCharacters(label) => {
                write!(f, "The {} may not include special characters.", label)
            }
            NameError::NotTextFile => {
                write!(f, "Your file name must have a proper text file extension")
            }
            NameError::NotImageFile => {
                write!(f, "Your file name must have a proper image file extension")
            }
            NameError::UnsupportedUpload => {
                write!(f, "Uploaded files must be .txt, .md, .jpg, .jpeg or .png")
            }
            NameError::InUse => write!(f, "File name in use"),
        }
    }
}

impl std::error::Error for NameError {}

pub fn is_allowed_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '!' | '.' | '?' | ',' | '_' | ' ')
}

/// Check `name` against the character whitelist and the rules for `name_use`.
/// `existing` is the current directory listing.
pub fn validate<S: AsRef<str>>(
    name: &str,
    name_use: NameUse<'_>,
    existing: &[S],
) -> Result<(), NameError> {
    let label = name_use.label();
    if name.is_empty() {
        return Err(NameError::Required(label.to_string()));
    }
    if !name.chars().all(is_allowed_char) {
        return Err(NameError::SpecialCharacters(label.to_string()));
    }

    let ext = extension(name);
    match name_use {
        NameUse::Field(_) => Ok(()),
        NameUse::Upload => {
            if DocumentKind::from_filename(name).is_none() {
                return Err(NameError::UnsupportedUpload);
            }
            Ok(())
        }
        NameUse::Create => {
            if !TEXT_EXTENSIONS.contains(&ext.as_str()) {
                return Err(NameError::NotTextFile);
            }
            reject_in_use(name, existing)
        }
        NameUse::Rename(kind) => {
            let family_ok = match kind {
                DocumentKind::Text | DocumentKind::Markdown => {
                    TEXT_EXTENSIONS.contains(&ext.as_str())
                }
                DocumentKind::Image => IMAGE_EXTENSIONS.contains(&ext.as_str()),
            };
            if !family_ok {
                return Err(match kind {
                    DocumentKind::Image => NameError::NotImageFile,
                    _ => NameError::NotTextFile,
                });
            }
            reject_in_use(name, existing)
        }
    }
}

fn reject_in_use<S: AsRef<str>>(name: &str, existing: &[S]) -> Result<(), NameError> {
    if name_in_use(name, existing) {
        return Err(NameError::InUse);
    }
    Ok(())
}

pub fn name_in_use<S: AsRef<str>>(name: &str, existing: &[S]) -> bool {
    existing
        .iter()
        .any(|entry| entry.as_ref().eq_ignore_ascii_case(name))
}

/// Splits on the last dot. A leading dot (".hidden") is not an extension.
fn split_base_ext(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
    }
}

/// Lowercase extension including the dot, or an empty string.
pub fn extension(name: &str) -> String {
    match split_base_ext(name) {
        (_, Some(ext)) => format!(".{}", ext.to_ascii_lowercase()),
        (_, None) => String::new(),
    }
}

pub fn basename(name: &str) -> &str {
    split_base_ext(name).0
}

pub fn downcase_ext(name: &str) -> String {
    match split_base_ext(name) {
        (base, Some(ext)) => format!("{}.{}", base, ext.to_ascii_lowercase()),
        (base, None) => base.to_string(),
    }
}

/// Increments the trailing decimal run of the basename, keeping the prefix
/// and extension: `image.jpg` -> `image1.jpg`, `9image10.jpg` -> `9image11.jpg`.
pub fn append_next_num(name: &str) -> String {
    let (base, ext) = split_base_ext(name);
    let digits_start = base
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(base.len());
    let (prefix, digits) = base.split_at(digits_start);
    let next = increment_decimal(digits);
    match ext {
        Some(ext) => format!("{}{}.{}", prefix, next, ext),
        None => format!("{}{}", prefix, next),
    }
}

/// Adds one to an unsigned decimal string of any length.
/// Leading zeros are dropped; the empty string counts as zero.
fn increment_decimal(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let mut out: Vec<u8> = trimmed.bytes().collect();
    let mut carry = true;
    for byte in out.iter_mut().rev() {
        if !carry {
            break;
        }
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            carry = false;
        }
    }
    if carry {
        out.insert(0, b'1');
    }
    out.into_iter().map(char::from).collect()
}

/// Applies `append_next_num` until the name no longer collides.
pub fn next_free_name<S: AsRef<str>>(name: &str, existing: &[S]) -> String {
    let mut candidate = name.to_string();
    while name_in_use(&candidate, existing) {
        candidate = append_next_num(&candidate);
    }
    candidate
}
