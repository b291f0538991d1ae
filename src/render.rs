//! Turns a [`Menu`] into what the results panel shows.

use crate::model::{Beverage, Dish, Menu};

pub const DISH_FALLBACK: &str = "🍽️";

/// Two decimals, halves rounded away from zero (`0.125` shows as `€0.13`).
pub fn format_price(value: f64) -> String {
    format!("€{:.2}", (value * 100.0).round() / 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub dish_count: usize,
    pub beverage_count: usize,
    /// Already formatted; absent when the menu has no (or a zero) cover charge.
    pub cover_charge: Option<String>,
}

impl Summary {
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("Totale piatti", self.dish_count.to_string()),
            ("Totale bevande", self.beverage_count.to_string()),
        ];
        if let Some(cover) = &self.cover_charge {
            lines.push(("Coperto", cover.clone()));
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DishCard {
    pub name: String,
    pub category: String,
    pub price: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeverageCard {
    pub name: String,
    pub price: String,
    pub description: Option<String>,
}

/// Everything the results panel needs, with prices already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuView {
    pub summary: Summary,
    pub dishes: Vec<DishCard>,
    pub beverages: Vec<BeverageCard>,
}

impl MenuView {
    pub fn from_menu(menu: &Menu) -> Self {
        Self {
            summary: Summary {
                dish_count: menu.piatti.len(),
                beverage_count: menu.bevande.len(),
                cover_charge: menu
                    .prezzo_coperto
                    .filter(|cover| *cover != 0.0)
                    .map(format_price),
            },
            dishes: menu.piatti.iter().map(DishCard::from).collect(),
            beverages: menu.bevande.iter().map(BeverageCard::from).collect(),
        }
    }

    pub fn show_beverages(&self) -> bool {
        !self.beverages.is_empty()
    }
}

fn non_empty(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl From<&Dish> for DishCard {
    fn from(dish: &Dish) -> Self {
        Self {
            name: dish.nome.clone(),
            category: dish.categoria.clone(),
            price: format_price(dish.prezzo),
            description: non_empty(&dish.descrizione),
            image_url: non_empty(&dish.image_url),
        }
    }
}

impl From<&Beverage> for BeverageCard {
    fn from(beverage: &Beverage) -> Self {
        Self {
            name: beverage.nome.clone(),
            price: format_price(beverage.prezzo),
            description: non_empty(&beverage.descrizione),
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn summary_html(summary: &Summary) -> String {
    summary
        .lines()
        .into_iter()
        .map(|(label, value)| {
            format!(
                "<p><strong>{}:</strong> {}</p>",
                label,
                escape_html(&value)
            )
        })
        .collect()
}

pub fn dish_card_html(card: &DishCard) -> String {
    // A broken image link swaps itself for the fallback glyph.
    let image = match &card.image_url {
        Some(url) => format!(
            r#"<img src="{}" alt="{}" onerror="this.parentElement.innerHTML='{}'">"#,
            escape_html(url),
            escape_html(&card.name),
            DISH_FALLBACK
        ),
        None => DISH_FALLBACK.to_string(),
    };
    let description = card
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="piatto-descrizione">{}</p>"#, escape_html(d)))
        .unwrap_or_default();

    format!(
        r#"<div class="piatto-card">
    <div class="piatto-image">{image}</div>
    <div class="piatto-content">
        <span class="piatto-categoria">{category}</span>
        <div class="piatto-header">
            <h3 class="piatto-nome">{name}</h3>
            <span class="piatto-prezzo">{price}</span>
        </div>
        {description}
    </div>
</div>
"#,
        category = escape_html(&card.category),
        name = escape_html(&card.name),
        price = escape_html(&card.price),
    )
}

pub fn beverage_card_html(card: &BeverageCard) -> String {
    let description = card
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="bevanda-descrizione">{}</p>"#, escape_html(d)))
        .unwrap_or_default();

    format!(
        r#"<div class="bevanda-card">
    <div class="bevanda-header">
        <span class="bevanda-nome">🥤 {name}</span>
        <span class="bevanda-prezzo">{price}</span>
    </div>
    {description}
</div>
"#,
        name = escape_html(&card.name),
        price = escape_html(&card.price),
    )
}
