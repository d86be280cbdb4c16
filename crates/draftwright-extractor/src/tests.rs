//! Conversation-level tests for the extractor

#[cfg(test)]
mod tests {
    use crate::{ConversationStateExtractor, ExtractorConfig, ExtractorError, FlowTransition};
    use draftwright_domain::{ChargeField, FlowKind, HeaderField, ItemField, LineItem};

    fn quotation_item() -> LineItem {
        LineItem::new()
            .with(ItemField::Code, "B105")
            .with(ItemField::Category, "Oli Bekas")
            .with(ItemField::Unit, "Liter")
            .with(ItemField::Price, "15000")
    }

    #[test]
    fn test_quotation_end_to_end() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");

        extractor.mine_reply("Nama: **PT Contoh Abadi**");
        let draft = extractor.draft().unwrap();
        assert_eq!(draft.header(HeaderField::CompanyName), Some("PT Contoh Abadi"));

        let outcome = extractor.mine_reply("Alamat: **alamat belum ditemukan**");
        assert!(outcome.is_noop());
        assert_eq!(extractor.draft().unwrap().header(HeaderField::CompanyAddress), None);

        let outcome = extractor.mine_reply(
            "Kode: **B105**, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**",
        );
        assert!(outcome.item_pending);
        assert!(extractor.has_pending_item());
        assert!(extractor.draft().unwrap().line_items().is_empty());

        let outcome = extractor.mine_reply("Item #1 tersimpan");
        assert!(outcome.item_promoted);
        assert!(!extractor.has_pending_item());
        assert_eq!(extractor.draft().unwrap().line_items(), &[quotation_item()]);

        let outcome = extractor.mine_reply("🎉 Quotation berhasil dibuat");
        assert!(outcome.completion_seen);

        let snapshot = extractor.try_finalize(None).unwrap().unwrap();
        assert_eq!(snapshot.flow_kind(), FlowKind::Quotation);
        assert_eq!(snapshot.header(HeaderField::CompanyName), Some("PT Contoh Abadi"));
        assert_eq!(snapshot.header(HeaderField::CompanyAddress), None);
        assert_eq!(snapshot.line_items(), &[quotation_item()]);

        assert!(extractor.draft().is_none());
        assert_eq!(extractor.active_flow(), FlowKind::None);
    }

    #[test]
    fn test_quotation_from_html_replies() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("buat penawaran");

        extractor.mine_reply(
            "Baik, data perusahaan:<br>Nama Perusahaan: <b>PT Contoh Abadi</b><br>\
             Alamat: <strong>Jl. Merdeka No. 1, Bandung</strong><br>\
             Nomor Surat: <b>007/KLM-QT/2025</b>",
        );
        extractor.mine_reply(
            "Kode Limbah: &lt;b&gt;A336-1&lt;/b&gt;<br>Jenis Limbah: <b>Sludge IPAL</b><br>\
             Satuan: <b>Kg</b><br>Harga: <b>Rp 3.500</b>",
        );
        extractor.mine_reply("✅ Item #1 (A336-1) tersimpan.");
        extractor.mine_reply(
            r"Kode: <b>B105</b>, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**",
        );
        extractor.mine_reply("Item #2 tersimpan");
        extractor.mine_reply(
            "Harga Transportasi: <b>Rp 1.200.000/ritase</b><br>Termin: <b>30 hari</b>",
        );
        extractor.mine_reply("<p>🎉 Quotation berhasil dibuat!</p>");

        let snapshot = extractor.try_finalize(Some(FlowKind::Quotation)).unwrap().unwrap();
        assert_eq!(snapshot.header(HeaderField::SequencePrefix), Some("007"));
        assert_eq!(
            snapshot.header(HeaderField::CompanyAddress),
            Some("Jl. Merdeka No. 1, Bandung")
        );
        assert_eq!(snapshot.line_items().len(), 2);
        assert_eq!(snapshot.line_items()[0].get(ItemField::Code), Some("A336-1"));
        assert_eq!(snapshot.line_items()[1], quotation_item());
        assert_eq!(snapshot.charge(ChargeField::TransportCharge), Some("1200000"));
        assert_eq!(snapshot.charge(ChargeField::PaymentTermDays), Some("30"));
    }

    #[test]
    fn test_mou_round_trip() {
        let mut extractor = ConversationStateExtractor::new();
        assert_eq!(
            extractor.notify_user_message("Saya mau buat MoU tripartit"),
            FlowTransition::Started(FlowKind::MemorandumOfUnderstanding)
        );

        extractor.mine_reply("Pihak Pertama: **PT Pengolah Limbah**");
        extractor.mine_reply("Pihak Kedua: **PT Contoh Abadi**\nAlamat: **Jl. Industri 9**");
        extractor.mine_reply("Pihak Ketiga: **CV Angkut Jaya**");
        extractor.mine_reply("Kode: **B105**, Jenis: **Oli Bekas**\nItem #1 tersimpan");
        extractor.mine_reply("Biaya MoU: **Rp 5.000.000/Tahun**");
        extractor.mine_reply("MoU berhasil dibuat");

        let snapshot = extractor.try_finalize(None).unwrap().unwrap();
        assert_eq!(snapshot.flow_kind(), FlowKind::MemorandumOfUnderstanding);
        assert_eq!(snapshot.header(HeaderField::SecondParty), Some("PT Contoh Abadi"));
        assert_eq!(snapshot.header(HeaderField::ThirdParty), Some("CV Angkut Jaya"));
        assert_eq!(snapshot.charge(ChargeField::ServiceCharge), Some("5000000"));
        assert_eq!(snapshot.line_items().len(), 1);
    }

    #[test]
    fn test_invoice_round_trip() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("tolong bikin invoice");

        extractor.mine_reply("Nomor Invoice: **INV/2025/031**\nKepada: **PT Contoh Abadi**");
        extractor.mine_reply(
            "Deskripsi: **Oli Bekas**, Jumlah: **1.500**, Satuan: **Liter**, Harga Satuan: **Rp 15.000**",
        );
        extractor.mine_reply("Item #1 tersimpan");
        extractor.mine_reply("Jatuh Tempo: **14 hari**");
        extractor.mine_reply("Invoice berhasil dibuat");

        let snapshot = extractor.try_finalize(Some(FlowKind::Invoice)).unwrap().unwrap();
        assert_eq!(snapshot.header(HeaderField::InvoiceNumber), Some("INV/2025/031"));
        assert_eq!(snapshot.header(HeaderField::CompanyName), Some("PT Contoh Abadi"));
        assert_eq!(snapshot.charge(ChargeField::PaymentTermDays), Some("14"));

        let item = &snapshot.line_items()[0];
        assert_eq!(item.get(ItemField::Quantity), Some("1500"));
        assert_eq!(item.get(ItemField::Unit), Some("Liter"));
        assert_eq!(item.get(ItemField::Price), Some("15000"));
    }

    #[test]
    fn test_flow_switch_discards_pending_item() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply(
            "Kode: **B105**, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**",
        );
        assert!(extractor.has_pending_item());

        extractor.notify_user_message("eh, buatkan invoice saja");
        assert_eq!(extractor.active_flow(), FlowKind::Invoice);
        assert!(extractor.draft().is_none());
        assert!(!extractor.has_pending_item());

        // The stale confirmation must not resurrect the quotation item.
        extractor.mine_reply("Item #1 tersimpan");
        assert!(extractor.draft().is_none());
    }

    #[test]
    fn test_flow_switch_discards_confirmed_items() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply("Nama: **PT Contoh Abadi**");
        extractor.mine_reply(
            "Kode: **B105**, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**\n\
             Item #1 tersimpan",
        );

        let transition = extractor.notify_user_message("ganti ke MoU");
        assert!(matches!(transition, FlowTransition::Switched { discarded: true, .. }));
        assert!(extractor.draft().is_none());
    }

    #[test]
    fn test_split_item_group_never_adds_item() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply("Kode: **B105**, Jenis: **Oli Bekas**");
        extractor.mine_reply("Satuan: **Liter**, Harga: **Rp 15.000**");
        extractor.mine_reply("Item #1 tersimpan");

        assert!(extractor.draft().is_none_or(|d| d.line_items().is_empty()));
    }

    #[test]
    fn test_completion_needs_marker_in_latest_reply() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply("Nama: **PT Contoh Abadi**");
        extractor.mine_reply(
            "Kode: **B105**, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**",
        );
        extractor.mine_reply("Quotation berhasil dibuat");
        // Marker came before the item was confirmed.
        assert_eq!(extractor.try_finalize(None), Ok(None));

        extractor.mine_reply("Item #1 tersimpan");
        assert_eq!(extractor.try_finalize(None), Ok(None));

        extractor.mine_reply("Quotation berhasil dibuat");
        assert!(extractor.try_finalize(None).unwrap().is_some());
    }

    #[test]
    fn test_neutral_messages_keep_draft() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply("Nama: **PT Contoh Abadi**");
        extractor.notify_user_message("PT Contoh Abadi, Bandung");
        extractor.notify_user_message("oke lanjut");

        assert_eq!(
            extractor.draft().unwrap().header(HeaderField::CompanyName),
            Some("PT Contoh Abadi")
        );
    }

    #[test]
    fn test_newer_header_value_overwrites() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply("Nama: **PT Contoh**");
        let outcome = extractor.mine_reply("Nama: **PT Contoh Abadi**");
        assert_eq!(outcome.fields_updated, 1);
        assert_eq!(
            extractor.draft().unwrap().header(HeaderField::CompanyName),
            Some("PT Contoh Abadi")
        );
    }

    #[test]
    fn test_hint_from_task_type() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message_with_hint("mulai", Some(FlowKind::from_task_type("mou")));
        assert_eq!(extractor.active_flow(), FlowKind::MemorandumOfUnderstanding);

        // Hint naming the active flow is not a switch.
        assert_eq!(
            extractor.notify_user_message_with_hint("lanjut", Some(FlowKind::MemorandumOfUnderstanding)),
            FlowTransition::Unchanged
        );
    }

    #[test]
    fn test_payment_term_answer_keeps_quotation() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply("Nama: **PT Contoh Abadi**");

        assert_eq!(
            extractor.notify_user_message("termin tagihan 30 hari"),
            FlowTransition::Unchanged
        );
        extractor.mine_reply("Termin: **30 hari**");

        let draft = extractor.draft().unwrap();
        assert_eq!(draft.header(HeaderField::CompanyName), Some("PT Contoh Abadi"));
        assert_eq!(draft.charge(ChargeField::PaymentTermDays), Some("30"));
    }

    #[test]
    fn test_screen_task_type_does_not_end_other_flow() {
        let mut extractor = ConversationStateExtractor::new();
        let screen = Some(FlowKind::Quotation);
        extractor.notify_user_message_with_hint("Buatkan invoice", screen);
        extractor.mine_reply("Nomor Invoice: **INV-9**");
        extractor.notify_user_message_with_hint("PT Contoh Abadi", screen);
        extractor.mine_reply("Kepada: **PT Contoh Abadi**");

        assert_eq!(extractor.active_flow(), FlowKind::Invoice);
        let draft = extractor.draft().unwrap();
        assert_eq!(draft.header(HeaderField::InvoiceNumber), Some("INV-9"));
        assert_eq!(draft.header(HeaderField::CompanyName), Some("PT Contoh Abadi"));
    }

    #[test]
    fn test_invoice_with_reordered_labels_and_decimal_quantity() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("tolong bikin invoice");
        extractor.mine_reply("Nomor Invoice: **INV/2025/032**");
        extractor.mine_reply(
            "Deskripsi: **Sludge IPAL**, Jumlah: **2,5 Ton**, \
             Harga Satuan: **Rp 750.000**, Satuan: **Ton**",
        );
        extractor.mine_reply("Item #1 tersimpan");
        extractor.mine_reply("Invoice berhasil dibuat");

        let snapshot = extractor.try_finalize(Some(FlowKind::Invoice)).unwrap().unwrap();
        let item = &snapshot.line_items()[0];
        assert_eq!(item.get(ItemField::Unit), Some("Ton"));
        assert_eq!(item.get(ItemField::Price), Some("750000"));
        assert_eq!(item.get(ItemField::Quantity), Some("2.5"));
    }

    #[test]
    fn test_legacy_defaults_fill_snapshot() {
        let mut extractor =
            ConversationStateExtractor::with_config(ExtractorConfig::legacy()).unwrap();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply("Nama: **PT Contoh Abadi**");
        extractor.mine_reply(
            "Kode: **B105**, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**\n\
             Item #1 tersimpan\n🎉 Quotation berhasil dibuat",
        );

        let snapshot = extractor.try_finalize(None).unwrap().unwrap();
        assert_eq!(snapshot.header(HeaderField::SequencePrefix), Some("001"));
        assert_eq!(snapshot.charge(ChargeField::TransportCharge), Some("1200000"));
        assert_eq!(snapshot.charge(ChargeField::PaymentTermDays), Some("14"));
    }

    #[test]
    fn test_finalize_before_any_reply() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan invoice");
        assert_eq!(extractor.try_finalize(None), Err(ExtractorError::FinalizeBeforeReply));
    }

    #[test]
    fn test_snapshot_is_independent_of_later_dialogue() {
        let mut extractor = ConversationStateExtractor::new();
        extractor.notify_user_message("Buatkan quotation");
        extractor.mine_reply("Nama: **PT Contoh Abadi**");
        extractor.mine_reply(
            "Kode: **B105**, Jenis: **Oli Bekas**, Satuan: **Liter**, Harga: **Rp 15.000**\n\
             Item #1 tersimpan\nQuotation berhasil dibuat",
        );
        let snapshot = extractor.try_finalize(None).unwrap().unwrap();

        extractor.notify_user_message("Buatkan quotation lagi");
        extractor.mine_reply("Nama: **PT Lain**");

        assert_eq!(snapshot.header(HeaderField::CompanyName), Some("PT Contoh Abadi"));
        assert_eq!(
            extractor.draft().unwrap().header(HeaderField::CompanyName),
            Some("PT Lain")
        );
    }
}
