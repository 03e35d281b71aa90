//! Terminal rendering of a finished intake.

use intake::{Catalog, Portfolio, QuestionId, SubmissionReceipt};

/// Highest score the risk questions can add up to.
const MAX_RISK_SCORE: u32 = 28;

/// `₦1,250,000`, rounded to whole naira.
pub fn naira(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}₦{grouped}")
}

/// `Cash 10% · Income 40% · Growth 50%`, or `None` when no split came back.
pub fn portfolio_line(portfolio: &Portfolio) -> Option<String> {
    let parts: Vec<String> = [
        ("Cash", portfolio.cash),
        ("Income", portfolio.income),
        ("Growth", portfolio.growth),
    ]
    .into_iter()
    .filter_map(|(name, share)| share.map(|share| format!("{name} {share}%")))
    .collect();

    if parts.is_empty() {
        return None;
    }
    let line = parts.join(" · ");
    Some(if portfolio.custom == Some(true) {
        format!("{line} (custom)")
    } else {
        line
    })
}

pub fn print_receipt(receipt: &SubmissionReceipt) {
    let analysis = &receipt.analysis;
    println!("Thank you, {}. Your profile is ready.", receipt.submission.full_name);
    println!();
    println!("  Net worth:     {} ({})", naira(analysis.net_worth), analysis.net_worth_band);
    println!(
        "  Risk profile:  {} (score {}/{MAX_RISK_SCORE})",
        analysis.risk_profile, analysis.risk_score
    );
    println!("  Persona:       {}", analysis.persona);
    if let Some(line) = portfolio_line(&analysis.portfolio) {
        println!("  Portfolio:     {line}");
    }
    if !analysis.narrative.trim().is_empty() {
        println!();
        println!("{}", analysis.narrative.trim());
    }
}

pub fn print_answers(catalog: &Catalog, summary: &[(QuestionId, String)]) {
    if summary.is_empty() {
        return;
    }
    println!();
    println!("Your answers:");
    for (id, label) in summary {
        let prompt = catalog.question(id).map_or(id.as_str(), |q| q.prompt());
        println!("  {prompt}");
        println!("    {label}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naira_grouping() {
        assert_eq!(naira(0.0), "₦0");
        assert_eq!(naira(950.0), "₦950");
        assert_eq!(naira(1000.0), "₦1,000");
        assert_eq!(naira(125_000_000.0), "₦125,000,000");
        assert_eq!(naira(1_234_567.6), "₦1,234,568");
        assert_eq!(naira(-45_000.0), "-₦45,000");
    }

    #[test]
    fn test_portfolio_line() {
        let portfolio = Portfolio {
            custom: None,
            cash: Some(10.0),
            income: Some(40.0),
            growth: Some(50.0),
        };
        assert_eq!(
            portfolio_line(&portfolio).as_deref(),
            Some("Cash 10% · Income 40% · Growth 50%")
        );

        let custom = Portfolio {
            custom: Some(true),
            growth: None,
            ..portfolio
        };
        assert_eq!(
            portfolio_line(&custom).as_deref(),
            Some("Cash 10% · Income 40% (custom)")
        );

        assert_eq!(portfolio_line(&Portfolio::default()), None);
    }
}
