use finder_catalog::{NormalizedProducts, ProductDetail, ProductId, ProductSummary, ProductsPage};

/// A minimal in-stock product with a predictable name and price.
pub fn product(id: u64) -> ProductSummary {
    ProductSummary {
        id: ProductId::Number(id),
        name: format!("Product {id}"),
        price: id as f64 + 0.99,
        image_url: Some(format!("https://images.example.com/{id}.png")),
        availability: "In Stock".to_string(),
        category: Some("Misc".to_string()),
    }
}

/// `count` consecutive products starting at id `first`.
pub fn products(first: u64, count: usize) -> Vec<ProductSummary> {
    (first..).take(count).map(product).collect()
}

/// A page of `count` products without any total count signal.
pub fn page(first: u64, count: usize) -> ProductsPage {
    ProductsPage {
        products: NormalizedProducts {
            items: products(first, count),
            total: None,
        },
        total_header: None,
    }
}

/// A page of `count` products whose body reports `total`.
pub fn page_with_total(first: u64, count: usize, total: u64) -> ProductsPage {
    let mut page = page(first, count);
    page.products.total = Some(total);
    page
}

/// A page of `count` products with the total count header set to `header`.
pub fn page_with_header(first: u64, count: usize, header: &str) -> ProductsPage {
    let mut page = page(first, count);
    page.total_header = Some(header.to_string());
    page
}

pub fn detail(id: u64) -> ProductDetail {
    ProductDetail {
        summary: product(id),
        description: Some(format!("Description of product {id}")),
        specifications: None,
        brand: None,
        rating: None,
        reviews_count: None,
    }
}
