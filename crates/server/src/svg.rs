//! SVG rendering of badges and donation history.

use alloy_primitives::Address;
use gitpay_chain::stats::display_amount;

use crate::handlers::ProfileView;

/// Color table for one rendering theme.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub background: &'static str,
    pub card: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
}

const LIGHT: Theme = Theme {
    background: "#ffffff",
    card: "#f6f8fa",
    border: "#d0d7de",
    text: "#1f2328",
    muted: "#656d76",
    accent: "#1a7f37",
};

const DARK: Theme = Theme {
    background: "#0d1117",
    card: "#161b22",
    border: "#30363d",
    text: "#e6edf3",
    muted: "#8d96a0",
    accent: "#3fb950",
};

impl Theme {
    /// Picks a theme from the `?theme=` query value; anything unknown falls back
    /// to light.
    pub fn from_query(theme: Option<&str>) -> Self {
        match theme {
            Some("dark") => DARK,
            _ => LIGHT,
        }
    }
}

/// The compact badge: balance, totals and the most recent donations.
pub fn render_badge(view: &ProfileView, theme: Theme, limit: usize) -> String {
    let rows: Vec<_> = view.transfers.iter().take(limit).collect();
    let height = 118 + rows.len() as u32 * 20;

    let mut svg = String::with_capacity(2048);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="420" height="{height}" viewBox="0 0 420 {height}" role="img" aria-label="GitPay donations">"#
    ));
    svg.push_str(&format!(
        r#"<rect width="420" height="{height}" rx="8" fill="{}" stroke="{}"/>"#,
        theme.background, theme.border
    ));
    svg.push_str(&format!(
        r#"<text x="16" y="28" font-family="{FONT}" font-size="15" font-weight="600" fill="{}">{}</text>"#,
        theme.text,
        escape_xml(&view.title())
    ));
    svg.push_str(&format!(
        r#"<text x="16" y="52" font-family="{FONT}" font-size="13" fill="{}">Balance: {} {}</text>"#,
        theme.text,
        display_amount(view.balance, view.token.decimals),
        escape_xml(&view.token.symbol)
    ));
    svg.push_str(&format!(
        r#"<text x="16" y="72" font-family="{FONT}" font-size="12" fill="{}">Received {} {} across {} donations · sent {}</text>"#,
        theme.muted,
        view.stats.total_received_display(),
        escape_xml(&view.token.symbol),
        view.stats.received_count,
        view.stats.donated_count,
    ));
    svg.push_str(&format!(
        r#"<line x1="16" y1="84" x2="404" y2="84" stroke="{}"/>"#,
        theme.border
    ));

    let mut y = 104;
    for transfer in &rows {
        let memo = transfer.classification.memo.as_deref().unwrap_or("—");
        svg.push_str(&format!(
            r#"<text x="16" y="{y}" font-family="{FONT}" font-size="12" fill="{}">{}</text>"#,
            theme.muted,
            transfer.timestamp.format("%Y-%m-%d"),
        ));
        svg.push_str(&format!(
            r#"<text x="100" y="{y}" font-family="{FONT}" font-size="12" fill="{}">{}</text>"#,
            theme.accent,
            display_amount(transfer.effective_amount(), view.token.decimals),
        ));
        svg.push_str(&format!(
            r#"<text x="170" y="{y}" font-family="{FONT}" font-size="12" fill="{}">{}</text>"#,
            theme.text,
            escape_xml(&truncate(memo, 34)),
        ));
        y += 20;
    }
    if rows.is_empty() {
        svg.push_str(&format!(
            r#"<text x="16" y="104" font-family="{FONT}" font-size="12" fill="{}">No donations yet</text>"#,
            theme.muted
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// The full history image: one row per retained donation.
pub fn render_history(view: &ProfileView, theme: Theme, limit: usize) -> String {
    let rows: Vec<_> = view.transfers.iter().take(limit).collect();
    let height = 74 + rows.len().max(1) as u32 * 24;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="{height}" viewBox="0 0 640 {height}" role="img" aria-label="GitPay donation history">"#
    ));
    svg.push_str(&format!(
        r#"<rect width="640" height="{height}" rx="8" fill="{}" stroke="{}"/>"#,
        theme.background, theme.border
    ));
    svg.push_str(&format!(
        r#"<text x="16" y="28" font-family="{FONT}" font-size="15" font-weight="600" fill="{}">Donation history · {}</text>"#,
        theme.text,
        escape_xml(&view.title())
    ));
    svg.push_str(&format!(
        r#"<line x1="16" y1="42" x2="624" y2="42" stroke="{}"/>"#,
        theme.border
    ));

    let mut y = 64;
    for transfer in &rows {
        svg.push_str(&format!(r#"<rect x="10" y="{}" width="620" height="20" rx="4" fill="{}"/>"#, y - 14, theme.card));
        svg.push_str(&format!(
            r#"<text x="16" y="{y}" font-family="{FONT}" font-size="12" fill="{}">{}</text>"#,
            theme.muted,
            transfer.timestamp.format("%Y-%m-%d"),
        ));
        svg.push_str(&format!(
            r#"<text x="100" y="{y}" font-family="{FONT}" font-size="12" fill="{}">{}</text>"#,
            theme.text,
            short_address(transfer.from),
        ));
        svg.push_str(&format!(
            r#"<text x="210" y="{y}" font-family="{FONT}" font-size="12" fill="{}">{} {}</text>"#,
            theme.accent,
            display_amount(transfer.effective_amount(), view.token.decimals),
            escape_xml(&view.token.symbol),
        ));
        let memo = transfer.classification.memo.as_deref().unwrap_or("—");
        svg.push_str(&format!(
            r#"<text x="330" y="{y}" font-family="{FONT}" font-size="12" fill="{}">{}</text>"#,
            theme.text,
            escape_xml(&truncate(memo, 44)),
        ));
        y += 24;
    }
    if rows.is_empty() {
        svg.push_str(&format!(
            r#"<text x="16" y="64" font-family="{FONT}" font-size="12" fill="{}">No donations yet</text>"#,
            theme.muted
        ));
    }

    svg.push_str("</svg>");
    svg
}

const FONT: &str = "ui-sans-serif,system-ui,'Segoe UI',Helvetica,Arial,sans-serif";

/// `0x1234…abcd` form for table rows.
pub fn short_address(address: Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, U256, address};
    use chrono::{TimeZone, Utc};
    use gitpay_chain::{DonationStats, TaggedTransfer, token::TokenMetadata};
    use gitpay_primitives::Classification;

    fn view(transfers: Vec<TaggedTransfer>) -> ProfileView {
        let subject = address!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        let stats = DonationStats::compute(subject, &transfers, 6);
        ProfileView {
            subject,
            display_name: Some("vitalik.eth".into()),
            token: TokenMetadata {
                address: address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
                symbol: "USDC".into(),
                decimals: 6,
            },
            balance: U256::from(12_500_000u64),
            stats,
            transfers,
        }
    }

    fn donation(memo: &str) -> TaggedTransfer {
        let subject = address!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        TaggedTransfer {
            hash: B256::repeat_byte(1),
            from: address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"),
            to: Some(subject),
            raw_value: U256::from(1_500_000u64),
            block_number: 100,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            classification: Classification {
                tagged: true,
                recipient: Some(subject),
                amount: Some(U256::from(1_500_000u64)),
                memo: Some(memo.to_string()),
            },
        }
    }

    #[test]
    fn badge_shows_name_balance_and_memo() {
        let svg = render_badge(&view(vec![donation("nice work")]), Theme::from_query(None), 4);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("vitalik.eth"));
        assert!(svg.contains("Balance: 12.5 USDC"));
        assert!(svg.contains("nice work"));
        assert!(svg.contains(LIGHT.background));
    }

    #[test]
    fn empty_history_renders_placeholder() {
        let svg = render_history(&view(vec![]), Theme::from_query(Some("dark")), 10);
        assert!(svg.contains("No donations yet"));
        assert!(svg.contains(DARK.background));
    }

    #[test]
    fn memo_markup_is_escaped() {
        let svg = render_badge(&view(vec![donation("<script>&")]), Theme::from_query(None), 4);
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;&amp;"));
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let theme = Theme::from_query(Some("sepia"));
        assert_eq!(theme.background, LIGHT.background);
    }

    #[test]
    fn shortens_addresses() {
        let short = short_address(address!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"));
        assert_eq!(short, "0xd8dA…6045");
    }
}
