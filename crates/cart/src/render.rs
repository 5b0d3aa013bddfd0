use crate::MergedRow;

/// Renders merged rows as the plain text document served by the download
/// endpoint. Every line is CRLF terminated.
pub fn render_shopping_list(rows: &[MergedRow], site_url: &str) -> String {
    let border = "*".repeat(20);
    let mut content = format!("{border} Your shopping list {border}\r\n");

    for row in rows {
        content.push_str(&format!(
            "{} ({}) — {}\r\n",
            row.ingredient_name, row.unit, row.total_amount
        ));
    }

    content.push_str("Thank you for using our site\r\n");
    content.push_str(site_url);
    content.push_str("\r\n");

    content
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, unit: &str, total: i64) -> MergedRow {
        MergedRow {
            ingredient_name: name.to_string(),
            unit: unit.to_string(),
            total_amount: total,
        }
    }

    #[test]
    fn renders_header_rows_and_footer() {
        let text = render_shopping_list(
            &[row("Flour", "g", 300), row("Salt", "pinch", 1)],
            "https://foodgram.example.org",
        );

        let expected = "******************** Your shopping list ********************\r\n\
                        Flour (g) — 300\r\n\
                        Salt (pinch) — 1\r\n\
                        Thank you for using our site\r\n\
                        https://foodgram.example.org\r\n";

        assert_eq!(text, expected);
    }

    #[test]
    fn no_rows_still_render_header_and_footer() {
        let text = render_shopping_list(&[], "https://foodgram.example.org");

        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with("https://foodgram.example.org\r\n"));
    }

    #[test]
    fn every_line_is_crlf_terminated() {
        let text = render_shopping_list(&[row("Milk", "ml", 250)], "https://example.org");

        for line in text.split_inclusive("\r\n") {
            assert!(line.ends_with("\r\n"));
        }
    }
}
