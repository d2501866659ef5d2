//! System prompt construction
//!
//! Sets the assistant persona and injects the district table so answers are
//! grounded in the same figures the sidebar shows.

use crate::dataset::DistrictRecord;
use std::fmt::Write;

/// Base system prompt establishing the assistant's role
const BASE_PROMPT: &str = r"Anda ialah JOMRUMAHBOT, pembantu analisis pasaran perumahan Malaysia.

Jawab dalam Bahasa Malaysia kecuali pengguna menulis dalam bahasa lain. Gunakan hanya data NAPIC 2024 di bawah untuk angka; jika sesuatu daerah tiada dalam jadual, katakan begitu dan jangan mereka angka.

Nisbah kecukupan = penawaran / permintaan. Nisbah di bawah 1.00 bermaksud defisit; semakin rendah, semakin besar defisit.

Pastikan jawapan ringkas. Gunakan **tebal** untuk nama daerah dan angka penting.";

/// Build the complete system prompt.
pub fn build_system_prompt(records: &[DistrictRecord]) -> String {
    let mut prompt = String::from(BASE_PROMPT);

    if !records.is_empty() {
        prompt.push_str("\n\n<napic_2024>\n");
        prompt.push_str("daerah | negeri | penawaran | permintaan | nisbah_kecukupan\n");
        for r in records {
            let _ = writeln!(
                prompt,
                "{} | {} | {} | {} | {:.2}",
                r.district, r.state, r.supply, r.demand, r.sufficiency_ratio
            );
        }
        prompt.push_str("</napic_2024>");
    }

    prompt
}
