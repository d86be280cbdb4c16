//! Draftwright Extractor
//!
//! Turns the assistant side of a document-creation chat into structured
//! drafts and, once the assistant announces the document, into immutable
//! snapshots.
//!
//! # Overview
//!
//! The backend that actually builds quotations, MoUs and invoices only ever
//! answers in prose: `Nama: **PT Contoh Abadi**`, `Item #1 tersimpan`,
//! `🎉 Quotation berhasil dibuat`. The extractor follows that dialogue and
//! keeps a local, typed copy of what was agreed so far, so a client can
//! render a preview or hand the finished record to a document renderer.
//!
//! # Architecture
//!
//! ```text
//! user text ─→ FlowDetector ─→ active flow
//!                                  │
//! reply ─→ normalize_markup ─→ FieldMiner ─→ DraftRecord ─→ SnapshotRecord
//!                                  (pending item, markers)
//! ```
//!
//! # Key Features
//!
//! - **Flow detection**: keyword classification with a fixed precedence
//! - **Markup normalization**: HTML, entities and escapes folded into one form
//! - **Declarative rules**: label tables per flow, shared by all sessions
//! - **Confirmed items only**: an item group enters the draft only after
//!   the assistant acknowledges it
//! - **Single emission**: finalizing clears the session's draft
//!
//! # Example Usage
//!
//! ```
//! use draftwright_domain::{FlowKind, HeaderField};
//! use draftwright_extractor::{ConversationStateExtractor, ExtractorConfig};
//!
//! let mut extractor = ConversationStateExtractor::with_config(ExtractorConfig::default())?;
//!
//! extractor.notify_user_message("Tolong buatkan invoice");
//! extractor.mine_reply("Nomor Invoice: **INV/2025/031**<br>Nama: **PT Contoh Abadi**");
//! extractor.mine_reply(
//!     "Deskripsi: **Oli Bekas**, Jumlah: **200**, Satuan: **Liter**, Harga Satuan: **Rp 15.000**",
//! );
//! extractor.mine_reply("Item #1 tersimpan");
//! extractor.mine_reply("Invoice berhasil dibuat");
//!
//! if let Some(snapshot) = extractor.try_finalize(Some(FlowKind::Invoice))? {
//!     assert_eq!(snapshot.header(HeaderField::InvoiceNumber), Some("INV/2025/031"));
//!     assert_eq!(snapshot.line_items().len(), 1);
//! }
//! # Ok::<(), draftwright_extractor::ExtractorError>(())
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod flow;
pub mod input;
mod markup;
mod miner;
pub mod rules;
mod session;

#[cfg(test)]
mod tests;

pub use config::{ExtractorConfig, SnapshotDefaults};
pub use error::ExtractorError;
pub use extractor::{ConversationStateExtractor, FlowTransition, MineOutcome};
pub use flow::{FlowDetector, KeywordSet, INVOICE_KEYWORDS, MOU_KEYWORDS, QUOTATION_KEYWORDS};
pub use input::{normalize_address_fallback, normalize_dictation, normalize_user_input};
pub use markup::normalize_markup;
pub use miner::{
    confirmed_item_number, is_item_confirmed, match_rule, FieldMiner, MinedFields, RuleMatch,
};
pub use session::{SessionId, SessionRegistry};
