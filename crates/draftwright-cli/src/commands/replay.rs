//! Replay command implementation.

use crate::cli::ReplayArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use crate::transcript::Transcript;
use draftwright_domain::{FlowKind, SnapshotRecord};
use draftwright_extractor::{
    normalize_user_input, ConversationStateExtractor, ExtractorConfig, FlowTransition,
};
use tracing::debug;

/// Everything a replay produced.
#[derive(Debug)]
pub struct ReplayReport {
    /// Snapshots in emission order
    pub snapshots: Vec<SnapshotRecord>,

    /// Flow changes caused by user turns, in order
    pub transitions: Vec<FlowTransition>,

    /// Extractor state after the last turn
    pub extractor: ConversationStateExtractor,
}

/// Feed a transcript through a fresh extractor.
///
/// After every reply the extractor is asked to finalize, so each completion
/// marker backed by enough data yields exactly one snapshot.
pub fn replay_transcript(
    transcript: &Transcript,
    config: ExtractorConfig,
    default_hint: Option<FlowKind>,
) -> Result<ReplayReport> {
    let mut extractor = ConversationStateExtractor::with_config(config)?;
    let mut snapshots = Vec::new();
    let mut transitions = Vec::new();

    for (idx, turn) in transcript.turns.iter().enumerate() {
        debug!("Replaying turn {}", idx + 1);

        if turn.reset {
            extractor.reset_session();
        }

        if let Some(user) = &turn.user {
            let text = normalize_user_input(user);
            let hint = turn.hint_kind().or(default_hint);
            let transition = extractor.notify_user_message_with_hint(&text, hint);
            if transition != FlowTransition::Unchanged {
                transitions.push(transition);
            }
        }

        if let Some(reply) = &turn.reply {
            extractor.mine_reply(reply);
            if let Some(snapshot) = extractor.try_finalize(None)? {
                snapshots.push(snapshot);
            }
        }
    }

    Ok(ReplayReport {
        snapshots,
        transitions,
        extractor,
    })
}

/// Execute the replay command.
pub fn execute_replay(args: ReplayArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let transcript = Transcript::load(&args.file)?;
    let report = replay_transcript(
        &transcript,
        config.extractor.clone(),
        args.task_type.map(Into::into),
    )?;

    let verbose = formatter.format() == OutputFormat::Table;
    if verbose {
        for transition in &report.transitions {
            if let Some(line) = formatter.format_transition(*transition) {
                println!("{}", line);
            }
        }
    }

    for snapshot in &report.snapshots {
        println!("{}", formatter.format_snapshot(snapshot)?);
    }

    if verbose {
        println!(
            "{}",
            formatter.success(&format!(
                "Replayed {} turn(s), {} snapshot(s)",
                transcript.turns.len(),
                report.snapshots.len()
            ))
        );
        if report.extractor.draft().is_some() {
            println!("{}", formatter.info("Unfinished draft:"));
            println!(
                "{}",
                formatter.format_draft(
                    report.extractor.draft(),
                    report.extractor.has_pending_item()
                )?
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftwright_domain::HeaderField;

    const QUOTATION_CHAT: &str = r#"
        [[turns]]
        user = "Buatkan quotation"
        reply = "Nama: <b>PT Contoh Abadi</b>"

        [[turns]]
        user = "alamatnya gak ketemu"
        reply = "Alamat: **Di tempat**"

        [[turns]]
        user = "B105 oli bekas liter 15000"
        reply = "Kode: **B105**, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**"

        [[turns]]
        user = "ya"
        reply = "Item #1 tersimpan"

        [[turns]]
        user = "sudah"
        reply = "🎉 Quotation berhasil dibuat"
    "#;

    #[test]
    fn test_replay_emits_snapshot() {
        let transcript = Transcript::from_toml(QUOTATION_CHAT).unwrap();
        let report = replay_transcript(&transcript, ExtractorConfig::default(), None).unwrap();

        assert_eq!(report.snapshots.len(), 1);
        let snapshot = &report.snapshots[0];
        assert_eq!(snapshot.header(HeaderField::CompanyAddress), Some("Di tempat"));
        assert_eq!(snapshot.line_items().len(), 1);
        assert_eq!(
            report.transitions,
            vec![FlowTransition::Started(FlowKind::Quotation)]
        );
        assert!(report.extractor.draft().is_none());
    }

    #[test]
    fn test_replay_with_task_type() {
        let transcript = Transcript::from_toml(
            r#"
            [[turns]]
            user = "mulai"
            reply = "Nomor Invoice: **INV-9**"
            "#,
        )
        .unwrap();
        let report =
            replay_transcript(&transcript, ExtractorConfig::default(), Some(FlowKind::Invoice))
                .unwrap();

        assert!(report.snapshots.is_empty());
        let draft = report.extractor.draft().unwrap();
        assert_eq!(draft.header(HeaderField::InvoiceNumber), Some("INV-9"));
    }

    #[test]
    fn test_replay_reset_turn() {
        let transcript = Transcript::from_toml(
            r#"
            [[turns]]
            user = "Buatkan MoU"
            reply = "Pihak Kedua: **PT Contoh**"

            [[turns]]
            reset = true
            "#,
        )
        .unwrap();
        let report = replay_transcript(&transcript, ExtractorConfig::default(), None).unwrap();
        assert!(report.extractor.draft().is_none());
        assert_eq!(report.extractor.active_flow(), FlowKind::None);
    }

    #[test]
    fn test_execute_replay_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.toml");
        std::fs::write(&path, QUOTATION_CHAT).unwrap();

        let config = Config::default();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let args = ReplayArgs {
            file: path,
            task_type: None,
        };
        assert!(execute_replay(args, &config, &formatter).is_ok());
    }
}
