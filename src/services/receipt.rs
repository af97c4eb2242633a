//! Print payload for a committed order and its plain-text rendering.
//!
//! Rendering is a pure function of the payload and the layout settings; no
//! printer protocol is produced here.

use crate::{config::ReceiptConfig, models::OrderDetails};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const QTY_WIDTH: usize = 3;
const AMOUNT_WIDTH: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Everything the print collaborator needs for one order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptPayload {
    pub bill_number: i32,
    pub kot: i32,
    pub date: NaiveDate,
    pub cashier_id: i32,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub sgst: Decimal,
    pub cgst: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

pub fn build_payload(details: &OrderDetails) -> ReceiptPayload {
    let lines: Vec<ReceiptLine> = details
        .items
        .iter()
        .map(|item| ReceiptLine {
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_cost,
            line_total: item.line_total,
        })
        .collect();

    ReceiptPayload {
        bill_number: details.order.bill_number,
        kot: details.order.kot,
        date: details.order.date,
        cashier_id: details.order.cashier_id,
        subtotal: lines.iter().map(|l| l.line_total).sum(),
        discount: details
            .discount
            .as_ref()
            .map_or(Decimal::ZERO, |d| d.discount_amount),
        sgst: details.order.sgst,
        cgst: details.order.cgst,
        tax: details.order.tax,
        total: details.order.price,
        lines,
    }
}

/// Customer receipt followed by the kitchen ticket.
pub fn render_text(payload: &ReceiptPayload, layout: &ReceiptConfig) -> String {
    let width = layout.line_width;
    let name_width = width.saturating_sub(QTY_WIDTH + AMOUNT_WIDTH + 2);
    let mut out: Vec<String> = Vec::new();

    out.push(center(&layout.shop_name, width));
    if let Some(address) = layout.shop_address.as_deref() {
        out.push(center(address, width));
    }
    out.push(rule('-', width));
    out.push(format!("Token No: {}", payload.kot));
    out.push(format!("BILL NUMBER: {}", payload.bill_number));
    out.push(format!("Date: {}", payload.date.format("%d-%m-%Y")));
    out.push(rule('-', width));
    out.push(item_row("Item", "Qty", "Price", name_width));
    for line in &payload.lines {
        out.push(item_row(
            &line.name,
            &line.quantity.to_string(),
            &format!("{:.2}", line.line_total),
            name_width,
        ));
    }
    out.push(rule('-', width));
    out.push(pair("Subtotal", &format!("{:.2}", payload.subtotal), width));
    if payload.discount > Decimal::ZERO {
        out.push(pair("Discount", &format!("-{:.2}", payload.discount), width));
    }
    out.push(pair("SGST", &format!("{:.2}", payload.sgst), width));
    out.push(pair("CGST", &format!("{:.2}", payload.cgst), width));
    out.push(pair("TOTAL", &format!("{:.2}", payload.total), width));
    out.push(rule('-', width));
    out.push(center(&layout.footer, width));

    out.push(String::new());
    out.push(rule('=', width));
    out.push(center("KITCHEN ORDER", width));
    out.push(pair(
        &format!("KOT: {}", payload.kot),
        &format!("BILL: {}", payload.bill_number),
        width,
    ));
    out.push(rule('-', width));
    let ticket_name_width = width.saturating_sub(QTY_WIDTH + 3);
    for line in &payload.lines {
        let name: String = line.name.chars().take(ticket_name_width).collect();
        out.push(format!(
            "{:>qty_width$} x {}",
            line.quantity,
            name,
            qty_width = QTY_WIDTH
        ));
    }
    out.push(rule('-', width));

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn rule(c: char, width: usize) -> String {
    std::iter::repeat(c).take(width).collect()
}

fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
        .trim_end()
        .to_string()
}

fn item_row(name: &str, qty: &str, amount: &str, name_width: usize) -> String {
    let name: String = name.chars().take(name_width).collect();
    format!(
        "{:<name_width$} {:>qty_width$} {:>amount_width$}",
        name,
        qty,
        amount,
        name_width = name_width,
        qty_width = QTY_WIDTH,
        amount_width = AMOUNT_WIDTH
    )
}

/// Label on the left, value flush right. Falls back to two lines when both do not fit.
fn pair(label: &str, value: &str, width: usize) -> String {
    let used = label.chars().count() + value.chars().count();
    if used < width {
        format!("{}{}{}", label, " ".repeat(width - used), value)
    } else {
        format!("{}\n{:>width$}", label, value, width = width)
    }
}
