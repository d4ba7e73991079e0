// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Welcome screen slides shown before the document is opened.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WelcomeScreen {
    pub enabled: bool,
    pub slides: Vec<MessageSlide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_passphrase: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    #[default]
    Message,
    Question,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSlide {
    pub id: String,
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    pub text: String,
    /// Expected answer for question slides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub transition: SlideTransition,
}

/// How the viewer advances past a slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideTransition {
    #[default]
    Click,
    Auto { seconds: u32 },
}
