//! Plain-text rendering of the views for the terminal.

use std::fmt::Write as _;

use refurb_cart::CheckoutReceipt;
use refurb_catalog::format_price;

use crate::views::{CartView, LandingView, ProductCard, ShopView};

pub fn landing(view: &LandingView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Featured Products");
    if view.featured.is_empty() {
        let _ = writeln!(out, "  (nothing in stock)");
    }
    for card in &view.featured {
        product_line(&mut out, card);
    }

    let _ = writeln!(out, "\nShop by Category");
    for category in &view.categories {
        let _ = writeln!(
            out,
            "  {:<12} {}  -> {}",
            category.title,
            category.tagline.unwrap_or_default(),
            category.link
        );
    }
    out
}

pub fn shop(view: &ShopView) -> String {
    let mut out = String::new();
    if let Some(message) = view.error_message() {
        let _ = writeln!(out, "{message}");
        return out;
    }
    if view.is_loading() {
        let _ = writeln!(out, "Loading products...");
        return out;
    }

    let filters: Vec<String> = view
        .options
        .iter()
        .map(|option| {
            if option.is_selected(&view.selector) {
                format!("[{}]", option.label)
            } else {
                option.label.clone()
            }
        })
        .collect();
    let _ = writeln!(out, "Categories: {}", filters.join("  "));

    if view.products.is_empty() {
        let _ = writeln!(out, "No products found in this category.");
    }
    for card in &view.products {
        product_line(&mut out, card);
    }
    out
}

pub fn cart(view: &CartView) -> String {
    let mut out = String::new();
    if view.is_empty() {
        let _ = writeln!(out, "Your cart is empty");
        return out;
    }

    for line in &view.lines {
        let _ = writeln!(
            out,
            "  {} x{}  {}  ({} each)",
            line.product.name(),
            line.quantity,
            format_price(line.line_total()),
            format_price(line.product.price())
        );
    }
    let _ = writeln!(out, "Items: {}", view.summary.item_count);
    let _ = writeln!(out, "Subtotal: {}", view.subtotal());
    if let Some(savings) = view.savings() {
        let _ = writeln!(out, "You save: {savings}");
    }
    let _ = writeln!(out, "Total: {}", view.total());
    out
}

pub fn receipt(receipt: &CheckoutReceipt) -> String {
    format!(
        "Checkout {} complete: {} item(s), {} charged\n",
        receipt.checkout_id,
        receipt.item_count,
        format_price(receipt.subtotal)
    )
}

fn product_line(out: &mut String, card: &ProductCard) {
    let stock = if card.can_add_to_cart() { "" } else { "  Sold Out" };
    let _ = writeln!(
        out,
        "  {:<10} {:<28} {:<12} {} (was {}){stock}",
        card.product.id().as_str(),
        card.product.name(),
        card.category_label,
        card.price,
        card.msrp
    );
}
