// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

/// Content type for an image document, guessed from its extension.
pub fn image_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_from_extension() {
        assert_eq!(image_content_type("photo.JPG"), "image/jpeg");
        assert_eq!(image_content_type("photo.jpeg"), "image/jpeg");
        assert_eq!(image_content_type("shot.png"), "image/png");
    }

    #[test]
    fn non_images_fall_back_to_octet_stream() {
        assert_eq!(image_content_type("notes.txt"), "application/octet-stream");
        assert_eq!(image_content_type("noext"), "application/octet-stream");
    }
}
