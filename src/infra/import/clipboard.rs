/// Splits pasted spreadsheet text into rows of raw cells.
///
/// Rows are separated by `\n` (a trailing `\r` is dropped so Windows line
/// endings work) and cells by `\t`. There is no quoting: a tab or newline
/// inside a copied cell shifts the following cells.
pub fn split_clipboard_text(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// Renders rows the way a spreadsheet expects them on the clipboard.
pub fn join_clipboard_rows<I, R, S>(rows: I) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.as_ref().to_string())
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_rows_and_cells() {
        let rows = split_clipboard_text("a\tb\r\nc\td\te");
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string(), "e".to_string()],
            ]
        );
    }

    #[test]
    fn keeps_empty_cells_in_position() {
        let rows = split_clipboard_text("a\t\t\tb");
        assert_eq!(rows.first().map(Vec::len), Some(4));
        assert_eq!(rows.first().and_then(|row| row.get(3)).map(String::as_str), Some("b"));
    }

    #[test]
    fn quotes_are_not_interpreted() {
        let rows = split_clipboard_text("\"a\tb\"");
        assert_eq!(rows.first().map(Vec::len), Some(2));
    }

    #[test]
    fn join_is_tab_and_newline_delimited() {
        let text = join_clipboard_rows(vec![vec!["a", "b"], vec!["c", ""]]);
        assert_eq!(text, "a\tb\nc\t");
    }
}
