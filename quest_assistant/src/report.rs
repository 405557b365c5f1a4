use crate::account::AccountResult;

const HEADERS: [&str; 7] = [
    "Token #",
    "User ID",
    "Quest Name",
    "Completion Count",
    "Last Completed",
    "First Completed",
    "Status",
];

pub fn print_results(results: &[AccountResult]) {
    for line in render(results) {
        println!("{}", line);
    }
}

// Column widths are sized to the widest cell, plus two spaces of gutter.
pub fn render(results: &[AccountResult]) -> Vec<String> {
    if results.is_empty() {
        return vec![String::from("No results to display")];
    }

    let rows: Vec<[String; 7]> = results
        .iter()
        .enumerate()
        .map(|(i, result)| row(i, result))
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|header| header.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }
    for width in widths.iter_mut() {
        *width += 2;
    }

    let header_line: String = HEADERS
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{:<width$}", header, width = *width))
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.clone());
    lines.push("-".repeat(header_line.len()));
    for row in &rows {
        lines.push(
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect(),
        );
    }
    lines
}

fn row(i: usize, result: &AccountResult) -> [String; 7] {
    [
        (i + 1).to_string(),
        result.user_id.clone(),
        cell(&result.quest_name),
        result
            .completion_count
            .map(|count| count.to_string())
            .unwrap_or_else(|| String::from("N/A")),
        cell(&result.last_completed),
        cell(&result.first_completed),
        result.status.clone(),
    ]
}

fn cell(field: &Option<String>) -> String {
    field.clone().unwrap_or_else(|| String::from("N/A"))
}
