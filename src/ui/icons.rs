//! Shared UI icons and emojis.
//!
//! Each icon has a plain-text fallback for terminals without emoji support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

// Screens and actions
pub static BUG: Emoji<'_, '_> = Emoji("🐛 ", "");
pub static TRASH: Emoji<'_, '_> = Emoji("🗑️  ", "-");
pub static PENCIL: Emoji<'_, '_> = Emoji("📝 ", "~");
pub static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "?");
pub static USER: Emoji<'_, '_> = Emoji("👤 ", "");
