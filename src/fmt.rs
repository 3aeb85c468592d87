use crate::grid::codec::format_amount;

/// Dollar text for a total or balance: `$1,234.56`, `-$5.00`.
pub fn money(val: f64) -> String {
    let digits = format_amount(val.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Text for a debit or credit column. A transaction moves money one way,
/// so the untouched side shows blank rather than `$0.00`.
pub fn amount_cell(val: f64) -> String {
    if val == 0.0 {
        String::new()
    } else {
        money(val)
    }
}

fn group_thousands(whole: &str) -> String {
    let mut out = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
