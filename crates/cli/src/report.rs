use cardmatch_core::domain::export::RecommendationExport;
use cardmatch_core::domain::recommendation::ScoredCard;
use std::fmt::Write;

pub fn render(export: &RecommendationExport) -> String {
    let rec = &export.recommendation;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Recommendation generated {} ({} of {} catalog cards eligible)",
        export.generated_at.format("%Y-%m-%d %H:%M UTC"),
        rec.scored.len(),
        export.catalog_cards
    );

    if rec.best_overall.is_empty() {
        out.push_str("\nNo eligible cards.\n");
        return out;
    }

    out.push_str("\nTop picks:\n");
    for (rank, card) in rec.best_overall.iter().enumerate() {
        render_card(&mut out, rank + 1, card);
    }

    if !rec.best_by_category.is_empty() {
        out.push_str("\nBest by category:\n");
        for (category, leader) in &rec.best_by_category {
            let _ = writeln!(out, "  {category:<12} {} ({}x)", leader.name, leader.rate);
        }
    }

    out
}

fn render_card(out: &mut String, rank: usize, card: &ScoredCard) {
    let owned = if card.owned { " [owned]" } else { "" };
    let _ = writeln!(
        out,
        "  {rank}. {}{owned}: ${:.2}/yr (${:.2}/mo), avg {}x, fee ${:.2}, {}",
        card.name, card.estimates.annual, card.estimates.monthly, card.rate, card.annual_fee, card.level
    );
    for reason in &card.reasons {
        let _ = writeln!(out, "       - {reason}");
    }
}
