use prettytable::{row, Table};
use safe_multisig::SafeOverview;

use crate::{dump::DumpPlan, selection::is_dumpable};

/// `threshold / owners` as shown next to every Safe.
pub fn threshold_label(overview: &SafeOverview) -> String {
    format!("{} / {}", overview.threshold, overview.owners.len())
}

pub fn fiat_label(overview: &SafeOverview, currency: &str) -> String {
    match &overview.fiat_total {
        Some(total) => format!("{total} {}", currency.to_uppercase()),
        None => "-".to_string(),
    }
}

/// One line description of a Safe for selection prompts.
pub fn picker_label(overview: &SafeOverview, currency: &str) -> String {
    let mut label = format!(
        "{}  {}  [{}]",
        overview.safe_address(),
        fiat_label(overview, currency),
        threshold_label(overview)
    );
    if !is_dumpable(overview) {
        label.push_str("  (multisig, will be skipped)");
    }
    label
}

pub fn overview_table(overviews: &[SafeOverview], currency: &str) -> Table {
    let mut table = Table::new();

    table.add_row(row!["#", "address", "threshold", "balance", "dumpable"]);
    for (i, overview) in overviews.iter().enumerate() {
        let position = i + 1;
        let dumpable = if is_dumpable(overview) { "yes" } else { "no" };

        table.add_row(row![
            position,
            overview.safe_address(),
            threshold_label(overview),
            fiat_label(overview, currency),
            dumpable
        ]);
    }

    table
}

/// Safes of a plan, marked with whether they are part of the batch.
pub fn review_table(plan: &DumpPlan, currency: &str) -> Table {
    let mut table = Table::new();

    table.add_row(row!["", "address", "threshold", "balance"]);
    for overview in &plan.eligible {
        table.add_row(row![
            "✅",
            overview.safe_address(),
            threshold_label(overview),
            fiat_label(overview, currency)
        ]);
    }
    for overview in &plan.excluded {
        table.add_row(row![
            "❌",
            overview.safe_address(),
            threshold_label(overview),
            fiat_label(overview, currency)
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::overview;
    use alloy_primitives::Address;

    #[test]
    fn labels() {
        let single = overview(Address::repeat_byte(1), 1);
        let multi = overview(Address::repeat_byte(2), 2);

        assert_eq!(threshold_label(&single), "1 / 1");
        assert_eq!(threshold_label(&multi), "2 / 2");
        assert_eq!(fiat_label(&single, "usd"), "0.00 USD");
        assert!(!picker_label(&single, "USD").contains("skipped"));
        assert!(picker_label(&multi, "USD").ends_with("(multisig, will be skipped)"));
    }

    #[test]
    fn review_marks_excluded_safes() {
        let plan = DumpPlan::partition([
            overview(Address::repeat_byte(1), 1),
            overview(Address::repeat_byte(2), 2),
        ]);

        let rendered = review_table(&plan, "USD").to_string();

        assert!(rendered.contains("✅"));
        assert!(rendered.contains("❌"));
        assert_eq!(overview_table(&plan.eligible, "USD").len(), 2);
    }
}
