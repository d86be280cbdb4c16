//! Core ConversationStateExtractor implementation

use crate::config::{ExtractorConfig, SnapshotDefaults};
use crate::error::ExtractorError;
use crate::flow::FlowDetector;
use crate::markup::normalize_markup;
use crate::miner::FieldMiner;
use draftwright_domain::{
    ChargeField, DraftRecord, FlowKind, HeaderField, LineItem, SnapshotRecord,
};
use tracing::{debug, info, warn};

/// What a user message did to the active flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTransition {
    /// Active flow kept (neutral message, or same flow named again)
    Unchanged,

    /// A flow became active while none was
    Started(FlowKind),

    /// A different flow replaced the active one
    Switched {
        /// Previously active flow
        from: FlowKind,
        /// Newly active flow
        to: FlowKind,
        /// Whether mined data (draft or pending item) was thrown away
        discarded: bool,
    },
}

/// What one reply changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MineOutcome {
    /// Header fields and charges whose stored value changed
    pub fields_updated: usize,

    /// A complete item group formed (or replaced) the pending item
    pub item_pending: bool,

    /// Pending item moved into the line items
    pub item_promoted: bool,

    /// Completion marker of the active flow seen
    pub completion_seen: bool,

    /// Reply identical to the previous one; skipped
    pub duplicate: bool,
}

impl MineOutcome {
    /// Whether the reply left the draft untouched
    pub fn is_noop(&self) -> bool {
        self.fields_updated == 0 && !self.item_pending && !self.item_promoted
    }
}

/// Session-scoped state machine that turns assistant replies into a draft
///
/// One instance per chat session. Callers drive it in lock-step with the
/// conversation:
///
/// 1. [`notify_user_message`](Self::notify_user_message) for every outgoing message
/// 2. [`mine_reply`](Self::mine_reply) for the backend's answer
/// 3. [`try_finalize`](Self::try_finalize) to collect a finished record
///
/// Switching to another flow mid-dialogue discards everything mined for the
/// old flow, confirmed items included. That loss is deliberate and is
/// reported through [`FlowTransition::Switched`] and a warning log.
///
/// # Examples
///
/// ```
/// use draftwright_domain::{FlowKind, HeaderField};
/// use draftwright_extractor::ConversationStateExtractor;
///
/// let mut extractor = ConversationStateExtractor::new();
/// extractor.notify_user_message("Buatkan quotation");
/// extractor.mine_reply("Nama: <b>PT Contoh Abadi</b>");
/// extractor.mine_reply("Kode: **B105**, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**");
/// extractor.mine_reply("Item #1 tersimpan");
/// extractor.mine_reply("🎉 Quotation berhasil dibuat");
///
/// let snapshot = extractor.try_finalize(None).unwrap().unwrap();
/// assert_eq!(snapshot.flow_kind(), FlowKind::Quotation);
/// assert_eq!(snapshot.header(HeaderField::CompanyName), Some("PT Contoh Abadi"));
/// assert_eq!(snapshot.line_items().len(), 1);
/// assert!(extractor.draft().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ConversationStateExtractor {
    config: ExtractorConfig,
    detector: FlowDetector,
    miner: FieldMiner,
    active_flow: FlowKind,
    draft: Option<DraftRecord>,
    pending_item: Option<LineItem>,
    completion_seen: bool,
    last_reply: Option<String>,
    last_confirmed_item: Option<u32>,
    replies_mined: u64,
}

impl ConversationStateExtractor {
    /// Create an extractor with the default configuration
    pub fn new() -> Self {
        Self::from_validated(ExtractorConfig::default())
    }

    /// Create an extractor with a validated configuration
    pub fn with_config(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: ExtractorConfig) -> Self {
        Self {
            detector: FlowDetector::new(&config.flow_precedence),
            miner: FieldMiner::new(),
            config,
            active_flow: FlowKind::None,
            draft: None,
            pending_item: None,
            completion_seen: false,
            last_reply: None,
            last_confirmed_item: None,
            replies_mined: 0,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Currently active flow
    pub fn active_flow(&self) -> FlowKind {
        self.active_flow
    }

    /// Live draft, if anything has been mined for the active flow
    pub fn draft(&self) -> Option<&DraftRecord> {
        self.draft.as_ref()
    }

    /// Whether an item is under construction (its fields stay private)
    pub fn has_pending_item(&self) -> bool {
        self.pending_item.is_some()
    }

    /// Replies mined since the session started or was reset
    pub fn replies_mined(&self) -> u64 {
        self.replies_mined
    }

    /// Record an outgoing user message
    pub fn notify_user_message(&mut self, text: &str) -> FlowTransition {
        self.notify_user_message_with_hint(text, None)
    }

    /// Record an outgoing user message together with the caller's task type
    ///
    /// Keywords in the message win over the hint. The hint only applies
    /// when the message names no flow, no flow is active yet and
    /// `apply_hint_on_neutral` is set: it can start a flow but never switch
    /// away from one.
    pub fn notify_user_message_with_hint(
        &mut self,
        text: &str,
        hint: Option<FlowKind>,
    ) -> FlowTransition {
        // A new turn: the next reply is never a duplicate delivery.
        self.last_reply = None;

        let detected = self.detector.detect(text);
        let candidate = match hint {
            Some(hint)
                if !detected.is_concrete()
                    && !self.active_flow.is_concrete()
                    && self.config.apply_hint_on_neutral =>
            {
                hint
            }
            _ => detected,
        };

        if !candidate.is_concrete() || candidate == self.active_flow {
            return FlowTransition::Unchanged;
        }

        let from = self.active_flow;
        self.active_flow = candidate;

        if !from.is_concrete() {
            info!("Flow started: {}", candidate);
            return FlowTransition::Started(candidate);
        }

        let discarded = self.discard_draft();
        if discarded {
            warn!(
                "Flow switched from {} to {}; unsaved {} data discarded",
                from, candidate, from
            );
        } else {
            info!("Flow switched from {} to {}", from, candidate);
        }

        FlowTransition::Switched {
            from,
            to: candidate,
            discarded,
        }
    }

    /// Mine one backend reply into the draft
    ///
    /// Never fails. Replies with nothing recognizable leave the draft as it
    /// was; with no active flow every reply is a no-op.
    pub fn mine_reply(&mut self, raw: &str) -> MineOutcome {
        self.replies_mined += 1;
        let text = normalize_markup(raw);

        if self.config.skip_repeated_replies && self.last_reply.as_deref() == Some(text.as_str()) {
            debug!("Skipping repeated reply ({} chars)", text.len());
            return MineOutcome {
                completion_seen: self.completion_seen,
                duplicate: true,
                ..MineOutcome::default()
            };
        }

        self.completion_seen = false;
        let mut outcome = MineOutcome::default();

        if !self.active_flow.is_concrete() {
            debug!("No active flow; reply not mined");
            self.last_reply = Some(text);
            return outcome;
        }

        let mined = self.miner.mine(&text, self.active_flow);
        self.last_reply = Some(text);

        if !mined.headers.is_empty() || !mined.charges.is_empty() {
            let draft = self.draft_mut();
            for (field, value) in mined.headers {
                if draft.set_header(field, value) {
                    outcome.fields_updated += 1;
                }
            }
            for (field, value) in mined.charges {
                if draft.set_charge(field, value) {
                    outcome.fields_updated += 1;
                }
            }
        }

        if let Some(item) = mined.item {
            if self.pending_item.as_ref().is_some_and(|p| *p != item) {
                debug!("Pending {} item replaced before confirmation", self.active_flow);
            }
            self.draft_mut();
            self.pending_item = Some(item);
            outcome.item_pending = true;
        }

        if let Some(number) = mined.confirmed_item {
            outcome.item_promoted = self.confirm_item(number);
        }

        if mined.completion {
            self.completion_seen = true;
            outcome.completion_seen = true;
        }

        outcome
    }

    /// Collect the finished record, if the last reply completed the flow
    ///
    /// Returns `Ok(None)` when no flow is active, `expected` names another
    /// flow, the completion marker was not in the last reply, or the draft
    /// lacks an identifying header field or a confirmed line item. In all
    /// those cases nothing is reset.
    ///
    /// On success the draft, pending item and active flow are cleared
    /// before the snapshot is returned, so a second call cannot emit again.
    ///
    /// # Errors
    ///
    /// [`ExtractorError::FinalizeBeforeReply`] if no reply has been mined
    /// since the session started or was last reset.
    pub fn try_finalize(
        &mut self,
        expected: Option<FlowKind>,
    ) -> Result<Option<SnapshotRecord>, ExtractorError> {
        if self.replies_mined == 0 {
            return Err(ExtractorError::FinalizeBeforeReply);
        }

        if !self.active_flow.is_concrete() || !self.completion_seen {
            return Ok(None);
        }

        if let Some(expected) = expected.filter(FlowKind::is_concrete) {
            if expected != self.active_flow {
                debug!(
                    "Finalize for {} requested while {} is active",
                    expected, self.active_flow
                );
                return Ok(None);
            }
        }

        let finalizable = self.draft.as_ref().is_some_and(DraftRecord::is_finalizable);
        if !finalizable {
            warn!(
                "{} completion marker seen but draft is incomplete; no snapshot",
                self.active_flow
            );
            return Ok(None);
        }

        let Some(mut draft) = self.draft.take() else {
            return Ok(None);
        };
        let flow = self.active_flow;
        self.pending_item = None;
        self.last_confirmed_item = None;
        self.completion_seen = false;
        self.active_flow = FlowKind::None;

        if let Some(defaults) = &self.config.snapshot_defaults {
            apply_defaults(&mut draft, defaults);
        }

        let snapshot = SnapshotRecord::from_draft(draft);
        info!(
            "{} finalized with {} line item(s)",
            flow,
            snapshot.line_items().len()
        );
        Ok(Some(snapshot))
    }

    /// Forget everything: flow, draft, pending item and reply history
    pub fn reset_session(&mut self) {
        let discarded = self.discard_draft();
        info!(
            "Session reset (active flow: {}, data discarded: {})",
            self.active_flow, discarded
        );
        self.active_flow = FlowKind::None;
        self.last_reply = None;
        self.replies_mined = 0;
    }

    /// Promote the pending item for acknowledgement `number`
    ///
    /// An acknowledgement numbered at or below the last one promoted is a
    /// redelivery: it promotes nothing and drops a pending item that merely
    /// repeats the last line item.
    fn confirm_item(&mut self, number: u32) -> bool {
        if self.last_confirmed_item.is_some_and(|last| number <= last) {
            let repeats_last = self
                .draft
                .as_ref()
                .and_then(|d| d.line_items().last())
                .is_some_and(|last| self.pending_item.as_ref() == Some(last));
            if repeats_last {
                self.pending_item = None;
            }
            debug!("Item #{} already confirmed; acknowledgement ignored", number);
            return false;
        }

        let Some(item) = self.pending_item.take() else {
            debug!("Item #{} confirmation without a pending item ignored", number);
            return false;
        };
        self.last_confirmed_item = Some(number);
        let draft = self.draft_mut();
        draft.push_item(item);
        debug!("Item #{} confirmed; {} line item(s)", number, draft.line_items().len());
        true
    }

    fn draft_mut(&mut self) -> &mut DraftRecord {
        let flow = self.active_flow;
        self.draft.get_or_insert_with(|| {
            debug!("Draft created for {}", flow);
            DraftRecord::new(flow)
        })
    }

    /// Drop draft, pending item and completion flag. Returns whether any
    /// mined data was lost.
    fn discard_draft(&mut self) -> bool {
        let had_draft = self.draft.take().is_some_and(|d| !d.is_empty());
        let had_pending = self.pending_item.take().is_some();
        self.last_confirmed_item = None;
        self.completion_seen = false;
        had_draft || had_pending
    }
}

impl Default for ConversationStateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_defaults(draft: &mut DraftRecord, defaults: &SnapshotDefaults) {
    if draft.header(HeaderField::SequencePrefix).is_none() {
        draft.set_header(HeaderField::SequencePrefix, defaults.sequence_prefix.clone());
    }
    if draft.charge(ChargeField::TransportCharge).is_none() {
        draft.set_charge(ChargeField::TransportCharge, defaults.transport_charge.clone());
    }
    if draft.charge(ChargeField::PaymentTermDays).is_none() {
        draft.set_charge(ChargeField::PaymentTermDays, defaults.payment_term_days.clone());
    }
}
