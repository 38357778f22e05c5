//! Human readable rendering of catalog data.

use std::fmt::{Display, Formatter, Write};

use crossterm::style::Stylize;
use finder_catalog::{ProductDetail, ProductSummary};
use finder_sdk::models::pagination::PageControls;
use itertools::Itertools;

use super::colors::{self, BasicColor};

fn paint(text: &str, color: BasicColor, styled: bool) -> String {
    if styled {
        text.with(color.to_crossterm()).to_string()
    } else {
        text.to_string()
    }
}

fn availability(product: &ProductSummary, styled: bool) -> String {
    let color = if product.is_in_stock() {
        colors::IN_STOCK
    } else {
        colors::OUT_OF_STOCK
    };
    paint(&product.availability, color, styled)
}

/// A page of products, one per line with aligned columns.
pub struct DisplayProducts<'a> {
    pub products: &'a [ProductSummary],
    pub styled: bool,
}

impl Display for DisplayProducts<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id_width = self
            .products
            .iter()
            .map(|p| p.id.to_string().len())
            .max()
            .unwrap_or_default();
        let name_width = self
            .products
            .iter()
            .map(|p| p.name.chars().count())
            .max()
            .unwrap_or_default();
        let price_width = self
            .products
            .iter()
            .map(|p| p.display_price().len())
            .max()
            .unwrap_or_default();

        let lines = self.products.iter().map(|product| {
            let mut line = String::new();
            // Padding is applied before painting, escape codes have no width.
            let id = format!("{:<id_width$}", product.id.to_string());
            let price = format!("{:>price_width$}", product.display_price());
            let _ = write!(
                line,
                "{}  {:<name_width$}  {}  {}",
                paint(&id, colors::MUTED, self.styled),
                product.name,
                paint(&price, colors::PRICE, self.styled),
                availability(product, self.styled),
            );
            if let Some(category) = &product.category {
                let _ = write!(line, "  [{category}]");
            }
            line
        });

        write!(f, "{}", lines.format("\n"))
    }
}

/// The "Page X of Y" line below a page of products.
pub struct DisplayPageSummary {
    pub controls: PageControls,
    pub total_count: u64,
    pub is_authoritative: bool,
}

impl Display for DisplayPageSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Page {} of {}",
            self.controls.current_page, self.controls.total_pages
        )?;
        if self.is_authoritative {
            let noun = if self.total_count == 1 {
                "product"
            } else {
                "products"
            };
            write!(f, " ({} {noun})", self.total_count)?;
        } else {
            write!(f, " (more may follow)")?;
        }
        Ok(())
    }
}

/// All details of a single product.
pub struct DisplayProductDetail<'a> {
    pub product: &'a ProductDetail,
    pub styled: bool,
}

impl Display for DisplayProductDetail<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let product = self.product;
        let summary = &product.summary;

        let name = if self.styled {
            summary.name.as_str().bold().to_string()
        } else {
            summary.name.clone()
        };
        writeln!(f, "{name}")?;
        writeln!(
            f,
            "{}  {}",
            paint(&summary.display_price(), colors::PRICE, self.styled),
            availability(summary, self.styled)
        )?;
        if let Some(category) = &summary.category {
            writeln!(f, "Category: {category}")?;
        }
        if let Some(brand) = &product.brand {
            writeln!(f, "Brand: {brand}")?;
        }
        match (product.rating, product.reviews_count) {
            (Some(rating), Some(reviews)) => writeln!(f, "Rating: {rating:.1} ({reviews} reviews)")?,
            (Some(rating), None) => writeln!(f, "Rating: {rating:.1}")?,
            _ => {},
        }
        writeln!(f, "Image: {}", summary.image_url_or_placeholder())?;
        writeln!(f)?;
        write!(f, "{}", product.description_or_default())?;

        if let Some(specifications) = product.specifications.as_ref().filter(|s| !s.is_empty()) {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "Specifications:")?;
            for (key, value) in specifications {
                write!(f, "\n  {key}: {value}")?;
            }
        }
        Ok(())
    }
}
