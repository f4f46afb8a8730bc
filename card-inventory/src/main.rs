use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use card_client::{AuthClient, FileSession, HttpCardStore, SessionProvider};
use card_inventory::display::{card_category_color, card_rarity_color, stock_label};
use card_inventory::logger::init_logger;
use card_inventory::{
    ActionOutcome, Card, CardId, CardPayload, Confirmation, Inventory, InventoryConfig,
};
use clap::{Args, Parser, Subcommand};
use shared::client::{LoginRequest, RegisterRequest, ResetPasswordRequest};
use shared::models::{PendingImage, Rarity};

#[derive(Parser)]
#[command(name = "card-inventory", version, about = "Manage a collectible card inventory")]
struct Cli {
    /// API base URL
    #[arg(long, env = "CARD_API_URL")]
    api_url: Option<String>,

    /// File holding the login session
    #[arg(long, env = "CARD_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and keep the token for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
    },
    /// List every card with its stock
    List,
    /// Show one card
    Show { id: String },
    Create(CardFields),
    /// Edit a card; omitted fields keep their value
    Update {
        id: String,
        #[command(flatten)]
        fields: CardFields,
    },
    Delete { id: String },
    /// Check out one copy
    Checkout {
        id: String,
        /// Take the last copy without asking
        #[arg(long, short)]
        yes: bool,
    },
    /// Return one copy
    Return { id: String },
}

#[derive(Args)]
struct CardFields {
    #[arg(long)]
    name: Option<String>,
    /// Pokemon name
    #[arg(long)]
    subject: Option<String>,
    /// Energy type
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    rarity: Option<String>,
    #[arg(long)]
    length: Option<String>,
    #[arg(long)]
    weight: Option<String>,
    #[arg(long)]
    card_number: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    total: Option<u32>,
    /// Image file to upload
    #[arg(long)]
    image: Option<PathBuf>,
}

impl CardFields {
    fn apply(self, payload: &mut CardPayload) -> anyhow::Result<()> {
        if let Some(name) = self.name {
            payload.name = name;
        }
        if let Some(total) = self.total {
            payload.total_quantity = total;
        }
        if let Some(rarity) = self.rarity {
            let rarity: Rarity = rarity.parse().map_err(anyhow::Error::msg)?;
            payload.rarity = Some(rarity);
        }
        let optional = [
            (&mut payload.subject_name, self.subject),
            (&mut payload.category, self.category),
            (&mut payload.length, self.length),
            (&mut payload.weight, self.weight),
            (&mut payload.card_number, self.card_number),
            (&mut payload.description, self.description),
        ];
        for (slot, value) in optional {
            if value.is_some() {
                *slot = value;
            }
        }
        if let Some(path) = self.image {
            let image = PendingImage::from_path(&path)
                .with_context(|| format!("reading image {}", path.display()))?;
            payload.image = shared::ImageChange::Upload(image);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = InventoryConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(path) = cli.session_file {
        config = config.with_session_file(path);
    }
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level);
    }
    init_logger(&config.log_level, config.log_json, config.log_dir.as_deref());
    tracing::debug!(api_url = %config.api_url, "Starting card inventory");

    let session: Arc<dyn SessionProvider> = Arc::new(FileSession::new(&config.session_file));
    let transport = config.client_config().build_transport(session)?;
    let auth = AuthClient::new(transport.clone());
    let inventory = Inventory::new(Arc::new(HttpCardStore::new(transport)));

    match cli.command {
        Command::Login { email, password } => {
            let session = auth.login(&LoginRequest { email, password }).await?;
            println!("Logged in as {}", session.name.as_deref().unwrap_or("user"));
        }
        Command::Logout => {
            auth.logout()?;
            println!("Logged out");
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            auth.register(&RegisterRequest {
                name,
                email,
                c_password: password.clone(),
                password,
            })
            .await?;
            println!("Registered, you can now log in");
        }
        Command::ForgotPassword { email } => {
            auth.forgot_password(&email).await?;
            println!("Password reset email sent to {email}");
        }
        Command::ResetPassword {
            email,
            token,
            password,
        } => {
            auth.reset_password(&ResetPasswordRequest {
                email,
                token,
                c_password: password.clone(),
                password,
            })
            .await?;
            println!("Password updated");
        }
        Command::List => {
            let cards = inventory.load().await?.completed().unwrap_or_default();
            if cards.is_empty() {
                println!("No cards yet");
            }
            for card in &cards {
                print_row(card);
            }
        }
        Command::Show { id } => {
            let card = inventory.refresh_card(&CardId::new(id)).await?;
            print_card(&card);
        }
        Command::Create(fields) => {
            let mut payload = CardPayload::new("", 1);
            fields.apply(&mut payload)?;
            if let ActionOutcome::Completed(card) = inventory.create(&payload).await? {
                println!("Created card {}", card.id);
                print_card(&card);
            }
        }
        Command::Update { id, fields } => {
            let id = CardId::new(id);
            inventory.load().await?;
            let current = inventory.refresh_card(&id).await?;
            let mut payload = CardPayload::from_card(&current);
            fields.apply(&mut payload)?;
            if let ActionOutcome::Completed(card) = inventory.update(&id, &payload).await? {
                println!("Updated card {}", card.id);
                print_card(&card);
            }
        }
        Command::Delete { id } => {
            let id = CardId::new(id);
            inventory.delete(&id).await?;
            println!("Deleted card {id}");
        }
        Command::Checkout { id, yes } => {
            let id = CardId::new(id);
            inventory.load().await?;
            let mut outcome = inventory.checkout(&id, Confirmation::from(yes)).await?;
            if outcome == ActionOutcome::NeedsConfirmation {
                if !confirm("Only one copy left. Check it out?")? {
                    println!("Cancelled");
                    return Ok(());
                }
                outcome = inventory.checkout(&id, Confirmation::Confirmed).await?;
            }
            match outcome {
                ActionOutcome::Completed(card) => {
                    println!("Checked out {} ({} left)", card.name, card.remaining())
                }
                other => bail!("checkout did not complete: {other:?}"),
            }
        }
        Command::Return { id } => {
            let id = CardId::new(id);
            inventory.load().await?;
            if let ActionOutcome::Completed(card) = inventory.return_card(&id).await? {
                println!("Returned {} ({} left)", card.name, card.remaining());
            }
        }
    }
    Ok(())
}

fn print_row(card: &Card) {
    println!(
        "{:<8} {:<24} {:<12} {:<12} {:>3}/{:<3} {}",
        card.id,
        card.name,
        card.category.as_deref().unwrap_or("-"),
        card.rarity.map(|r| r.as_str()).unwrap_or("-"),
        card.checked_out_quantity,
        card.total_quantity,
        stock_label(card),
    );
}

fn print_card(card: &Card) {
    println!("{} ({})", card.name, card.id);
    if let Some(subject) = &card.subject_name {
        println!("  Pokemon:     {subject}");
    }
    if let Some(category) = &card.category {
        println!("  Energy:      {category} [{}]", card_category_color(card));
    }
    if let Some(rarity) = card.rarity {
        println!("  Rarity:      {rarity} [{}]", card_rarity_color(card));
    }
    for (label, value) in [
        ("Number", &card.card_number),
        ("Length", &card.length),
        ("Weight", &card.weight),
        ("Image", &card.card_image),
        ("Description", &card.description),
    ] {
        if let Some(value) = value {
            println!("  {:<12} {value}", format!("{label}:"));
        }
    }
    println!(
        "  Stock:       {}/{} checked out, {}",
        card.checked_out_quantity,
        card.total_quantity,
        stock_label(card)
    );
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
