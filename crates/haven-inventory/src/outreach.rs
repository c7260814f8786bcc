use std::fmt::Write as _;

use crate::StockLevel;

/// Donor post asking for the items in `low`. `None` when nothing is low.
#[must_use]
pub fn outreach_post(org_name: &str, low: &[StockLevel]) -> Option<String> {
    if low.is_empty() {
        return None;
    }

    let mut post = format!("{org_name} is running low on a few essentials:\n");
    for level in low {
        let stock = level.stock.max(0);
        let _ = writeln!(post, "- {} ({}): {stock} left", level.item, level.category);
    }
    post.push_str("If you can help, drop-offs are welcome any time we are open. Thank you!");
    Some(post)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(item: &str, stock: i64) -> StockLevel {
        StockLevel {
            item: item.into(),
            category: "food".into(),
            stock,
        }
    }

    #[test]
    fn nothing_low_means_no_post() {
        assert_eq!(outreach_post("Northside Shelter", &[]), None);
    }

    #[test]
    fn post_names_org_and_each_item() {
        let post = outreach_post("Northside Shelter", &[level("rice", 0), level("beans", 3)])
            .expect("post for low items");
        assert!(post.starts_with("Northside Shelter is running low"));
        assert!(post.contains("- rice (food): 0 left"));
        assert!(post.contains("- beans (food): 3 left"));
    }

    #[test]
    fn negative_stock_reads_as_none_left() {
        let post = outreach_post("Food Bank", &[level("soap", -2)]).expect("post");
        assert!(post.contains("- soap (food): 0 left"));
    }
}
