//! # Shell Commands
//!
//! Line-oriented front end for the cart and product commands. Each input
//! line is parsed as a `clap` multicall command: the first word names the
//! subcommand.
//!
//! ```text
//! storefront> products
//! storefront> view 1 9 red
//! storefront> inc
//! storefront> add
//! storefront> add 2 8 gray 3
//! storefront> update 1 9 red 5
//! storefront> remove 1 9 red
//! storefront> cart
//! storefront> quit
//! ```

use std::fmt::Write as _;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::commands::cart::{self, AddToCartRequest, CartResponse};
use crate::commands::product::ProductPanel;
use crate::error::ApiError;
use crate::state::{AppConfig, CartStore, Catalog};
use storefront_core::{LineItemKey, ProductId, Size};

/// One line of shell input.
#[derive(Debug, Parser)]
#[command(name = "storefront", multicall = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// List the catalog
    #[command(visible_alias = "list")]
    Products,

    /// Open a product's detail panel
    View(VariantArgs),

    /// Raise the open panel's quantity by one
    Inc,

    /// Lower the open panel's quantity by one
    Dec,

    /// Add a product to the cart; without an id, adds the open panel's selection
    Add(AddArgs),

    /// Set a line's quantity (0 or less removes it)
    Update(UpdateArgs),

    /// Remove a line from the cart
    #[command(visible_alias = "rm")]
    Remove(LineArgs),

    /// Show the cart
    #[command(visible_alias = "show")]
    Cart,

    /// Empty the cart
    Clear,

    /// Print the effective configuration
    Config,

    /// Leave the shell
    #[command(visible_aliases = ["exit", "q"])]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct VariantArgs {
    /// Catalog product id
    pub id: u64,
    /// Size (default: the product's first size)
    pub size: Option<String>,
    /// Color (default: the product's first color)
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct AddArgs {
    /// Catalog product id
    pub id: Option<u64>,
    /// Size (default: the product's first size)
    pub size: Option<String>,
    /// Color (default: the product's first color)
    pub color: Option<String>,
    /// Units to add, clamped to the available stock
    #[arg(allow_negative_numbers = true)]
    pub quantity: Option<i64>,
}

/// Identifies one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct LineArgs {
    pub id: u64,
    pub size: String,
    pub color: String,
}

impl LineArgs {
    pub fn key(&self) -> LineItemKey {
        LineItemKey::new(ProductId::new(self.id), Size::new(&self.size), self.color.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct UpdateArgs {
    pub id: u64,
    pub size: String,
    pub color: String,
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

impl UpdateArgs {
    pub fn key(&self) -> LineItemKey {
        LineItemKey::new(ProductId::new(self.id), Size::new(&self.size), self.color.as_str())
    }
}

/// Parses one input line. Blank lines parse to `None`.
///
/// `help` and `<command> --help` come back as a `clap::Error` whose
/// rendering is the help text.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }

    ShellLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

/// The command overview printed at startup.
pub fn help() -> String {
    ShellLine::command().render_help().to_string()
}

/// Renders the cart for the terminal.
pub fn render_cart(response: &CartResponse, config: &AppConfig) -> String {
    if response.items.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "CART{:>48}", format!("{} items", response.totals.total_items));
    for item in &response.items {
        let _ = writeln!(
            out,
            "  [{}] {} (size {}, {}) x{}  {}",
            item.product_id,
            item.name,
            item.selected_size,
            item.selected_color,
            item.quantity,
            config.format_currency(item.line_total()),
        );
    }
    let _ = write!(out, "TOTAL  {}", config.format_currency(response.totals.total_price));
    out
}

/// Renders the catalog listing.
pub fn render_products(catalog: &Catalog, config: &AppConfig) -> String {
    let mut out = String::new();
    for product in catalog.products() {
        let sizes: Vec<&str> = product.sizes.iter().map(Size::as_str).collect();
        let stock = if product.is_out_of_stock() {
            "out of stock".to_string()
        } else {
            format!("{} available", product.stock)
        };
        let _ = writeln!(
            out,
            "  [{}] {}  {}  sizes {}  colors {}  ({})",
            product.id,
            product.name,
            config.format_currency(product.price),
            sizes.join("/"),
            product.colors.join("/"),
            stock,
        );
    }
    out.trim_end().to_string()
}

/// Renders a product detail panel. Disabled picker buttons lose their brackets.
pub fn render_panel(panel: &ProductPanel, config: &AppConfig) -> String {
    let product = panel.product();
    let picker = panel.picker();

    let minus = if picker.can_decrement() { "[-]" } else { " - " };
    let plus = if picker.can_increment() { "[+]" } else { " + " };
    let stock = if picker.is_out_of_stock() {
        "out of stock".to_string()
    } else {
        format!("{} available", picker.stock())
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", product.name, config.format_currency(product.price));
    if !product.short_description.is_empty() {
        let _ = writeln!(out, "  {}", product.short_description);
    }
    let _ = writeln!(out, "  size {}  color {}", panel.size(), panel.color());
    let _ = write!(out, "  {} {} {}   {}", minus, picker.quantity(), plus, stock);
    out
}

/// State that lives across shell lines: the open product panel.
#[derive(Debug, Default)]
pub struct ShellSession {
    panel: Option<ProductPanel>,
}

impl ShellSession {
    pub fn new() -> Self {
        ShellSession::default()
    }

    pub fn panel(&self) -> Option<&ProductPanel> {
        self.panel.as_ref()
    }

    fn open_panel(&mut self) -> Result<&mut ProductPanel, ApiError> {
        self.panel
            .as_mut()
            .ok_or_else(|| ApiError::validation("No product open. Use `view <id>` first."))
    }

    /// Runs a parsed command and returns the text to print.
    pub fn execute(
        &mut self,
        command: ShellCommand,
        store: &CartStore,
        catalog: &Catalog,
        config: &AppConfig,
    ) -> Result<String, ApiError> {
        let output = match command {
            ShellCommand::Products => render_products(catalog, config),
            ShellCommand::View(args) => {
                let panel = ProductPanel::open(
                    catalog,
                    ProductId::new(args.id),
                    args.size.map(Size::new),
                    args.color,
                )?;
                let output = render_panel(&panel, config);
                self.panel = Some(panel);
                output
            }
            ShellCommand::Inc => {
                let panel = self.open_panel()?;
                panel.increment();
                render_panel(panel, config)
            }
            ShellCommand::Dec => {
                let panel = self.open_panel()?;
                panel.decrement();
                render_panel(panel, config)
            }
            ShellCommand::Add(args) => {
                let request = match args.id {
                    Some(id) => AddToCartRequest {
                        product_id: ProductId::new(id),
                        size: args.size.map(Size::new),
                        color: args.color,
                        quantity: args.quantity,
                    },
                    None => self.open_panel()?.add_request()?,
                };
                let response = cart::add_to_cart(store, catalog, request)?;
                format!("Product added to cart.\n{}", render_cart(&response, config))
            }
            ShellCommand::Update(args) => {
                render_cart(&cart::update_cart_item(store, &args.key(), args.quantity)?, config)
            }
            ShellCommand::Remove(args) => render_cart(&cart::remove_from_cart(store, &args.key())?, config),
            ShellCommand::Cart => render_cart(&cart::get_cart(store), config),
            ShellCommand::Clear => render_cart(&cart::clear_cart(store), config),
            ShellCommand::Config => config
                .to_toml()
                .map_err(|e| ApiError::internal(format!("Could not render configuration: {}", e)))?,
            ShellCommand::Quit => String::new(),
        };

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::MemoryStorage;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_blank() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse("add 1 9 red 2").unwrap(),
            Some(ShellCommand::Add(AddArgs {
                id: Some(1),
                size: Some("9".to_string()),
                color: Some("red".to_string()),
                quantity: Some(2),
            }))
        );

        assert_eq!(parse("add").unwrap(), Some(ShellCommand::Add(AddArgs::default())));
    }

    #[test]
    fn test_parse_update_and_remove() {
        let Some(ShellCommand::Update(args)) = parse("update 1 9 red -3").unwrap() else {
            panic!("expected update");
        };
        assert_eq!(args.quantity, -3);
        assert_eq!(args.key(), LineItemKey::new(ProductId::new(1), 9u32, "red"));

        let Some(ShellCommand::Remove(args)) = parse("rm 2 M blue").unwrap() else {
            panic!("expected remove");
        };
        assert_eq!(args.key(), LineItemKey::new(ProductId::new(2), "M", "blue"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("dance").is_err());
        assert!(parse("update 1 9 red").is_err());
        assert!(parse("remove 1").is_err());
        assert!(parse("view").is_err());
        assert!(parse("add one").is_err());
        assert!(parse("add 1 9 red lots").is_err());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse("cart").unwrap(), Some(ShellCommand::Cart));
        assert_eq!(parse("show").unwrap(), Some(ShellCommand::Cart));
        assert_eq!(parse("list").unwrap(), Some(ShellCommand::Products));
        assert_eq!(parse("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(parse("clear").unwrap(), Some(ShellCommand::Clear));
    }

    #[test]
    fn test_help() {
        let err = parse("help").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let text = help();
        assert!(text.contains("products"));
        assert!(text.contains("update"));
    }

    #[tokio::test]
    async fn test_execute_session() {
        let store = CartStore::open(MemoryStorage::new(), "cart").await;
        let catalog = Catalog::bundled().unwrap();
        let config = AppConfig::default();
        let mut session = ShellSession::new();

        let mut run = |line: &str| {
            let command = parse(line).unwrap().unwrap();
            session.execute(command, &store, &catalog, &config)
        };

        assert_eq!(run("cart").unwrap(), "Your cart is empty.");

        let output = run("add 1 9 red 2").unwrap();
        assert!(output.contains("Jordan 1 Retro High OG"));
        assert!(output.contains("TOTAL  $399.98"));

        let output = run("update 1 9 red 1").unwrap();
        assert!(output.contains("TOTAL  $199.99"));

        assert_eq!(run("add 3").unwrap_err().code, ErrorCode::OutOfStock);
        assert_eq!(run("remove 7 9 red").unwrap_err().code, ErrorCode::NotFound);

        assert_eq!(run("clear").unwrap(), "Your cart is empty.");
        assert!(run("products").unwrap().contains("out of stock"));
        assert!(run("config").unwrap().contains("storage_key"));
    }

    #[tokio::test]
    async fn test_panel_session() {
        let store = CartStore::open(MemoryStorage::new(), "cart").await;
        let catalog = Catalog::bundled().unwrap();
        let config = AppConfig::default();
        let mut session = ShellSession::new();

        let mut run = |line: &str| {
            let command = parse(line).unwrap().unwrap();
            session.execute(command, &store, &catalog, &config)
        };

        assert_eq!(run("inc").unwrap_err().code, ErrorCode::ValidationError);
        assert_eq!(run("add").unwrap_err().code, ErrorCode::ValidationError);

        let output = run("view 2 8 gray").unwrap();
        assert!(output.contains("1 [+]"));
        assert!(!output.contains("[-]"));

        for _ in 0..10 {
            run("inc").unwrap();
        }
        let output = run("dec").unwrap();
        assert!(output.contains("[-] 4 [+]"));

        let output = run("add").unwrap();
        assert!(output.contains("x4"));
        assert_eq!(store.total_items(), 4);
        assert_eq!(session.panel().map(|p| p.picker().quantity()), Some(4));
    }
}
