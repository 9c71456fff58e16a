use anyhow::Context;
use clap::{Parser, Subcommand};
use courier_config::load as load_config;
use courier_database::{GroupRepository, MessageRepository, NewDirectMessage, NewGroup, NewUser, UserRepository};
use courier_gateway::{create_router, GatewayState};
use courier_messaging::LocalMediaStore;
use courier_runtime::{telemetry, BackendServices};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "courier-backend")]
#[command(about = "Courier chat backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Dump users, groups, and messages from the database
    DumpData,
    /// Seed the database with test users and conversations
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::DumpData => dump_data().await,
        Commands::SeedData => seed_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Courier backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(
        services.db_pool.clone(),
        LocalMediaStore::new(&config.media),
    );
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(courier_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    println!("=== USERS ===");
    let users = sqlx::query(
        "SELECT id, public_id, username, email, created_at FROM users ORDER BY id ASC",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch users")?;

    if users.is_empty() {
        println!("No users found in database");
    } else {
        println!(
            "{:<5} {:<26} {:<20} {:<30} {:<25}",
            "ID", "Public ID", "Username", "Email", "Created At"
        );
        println!("{}", "-".repeat(110));
        for user in users {
            let id: i64 = user.get("id");
            let public_id: String = user.get("public_id");
            let username: String = user.get("username");
            let email: String = user.get("email");
            let created_at: String = user.get("created_at");
            println!(
                "{:<5} {:<26} {:<20} {:<30} {:<25}",
                id, public_id, username, email, created_at
            );
        }
    }

    println!("\n=== GROUPS ===");
    let groups = sqlx::query(
        "SELECT g.id, g.public_id, g.name, g.created_by, g.created_at,
                (SELECT COUNT(*) FROM group_members gm WHERE gm.group_id = g.id) AS member_count
         FROM groups g ORDER BY g.id ASC",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch groups")?;

    if groups.is_empty() {
        println!("No groups found in database");
    } else {
        println!(
            "{:<5} {:<26} {:<30} {:<10} {:<8} {:<25}",
            "ID", "Public ID", "Name", "Creator", "Members", "Created At"
        );
        println!("{}", "-".repeat(110));
        for group in groups {
            let id: i64 = group.get("id");
            let public_id: String = group.get("public_id");
            let name: String = group.get("name");
            let created_by: i64 = group.get("created_by");
            let member_count: i64 = group.get("member_count");
            let created_at: String = group.get("created_at");
            println!(
                "{:<5} {:<26} {:<30} {:<10} {:<8} {:<25}",
                id, public_id, name, created_by, member_count, created_at
            );
        }
    }

    println!("\n=== MESSAGES ===");
    let messages = sqlx::query(
        "SELECT id, public_id, sender_id, receiver_id, group_id, content, kind, read, created_at
         FROM messages ORDER BY created_at ASC, id ASC",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch messages")?;

    if messages.is_empty() {
        println!("No messages found in database");
    } else {
        println!(
            "{:<5} {:<26} {:<8} {:<10} {:<8} {:<40} {:<7} {:<6} {:<25}",
            "ID", "Public ID", "Sender", "Receiver", "Group", "Content (truncated)", "Kind", "Read", "Created At"
        );
        println!("{}", "-".repeat(150));
        for message in messages {
            let id: i64 = message.get("id");
            let public_id: String = message.get("public_id");
            let sender_id: i64 = message.get("sender_id");
            let receiver_id: Option<i64> = message.get("receiver_id");
            let group_id: Option<i64> = message.get("group_id");
            let content: String = message.get("content");
            let kind: String = message.get("kind");
            let read: bool = message.get("read");
            let created_at: String = message.get("created_at");

            let content_display = truncate_content(content);

            println!(
                "{:<5} {:<26} {:<8} {:<10} {:<8} {:<40} {:<7} {:<6} {:<25}",
                id,
                public_id,
                sender_id,
                receiver_id
                    .map(|id| id.to_string())
                    .unwrap_or("NULL".to_string()),
                group_id
                    .map(|id| id.to_string())
                    .unwrap_or("NULL".to_string()),
                content_display,
                kind,
                read,
                created_at
            );
        }
    }

    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding database with test data");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    let groups = GroupRepository::new(services.db_pool.clone());
    let messages = MessageRepository::new(services.db_pool.clone());

    let alice = users
        .create(&NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            avatar_url: None,
            token: Some("alice-token".to_string()),
        })
        .await
        .context("failed to seed user alice")?;
    let bob = users
        .create(&NewUser {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            avatar_url: None,
            token: Some("bob-token".to_string()),
        })
        .await
        .context("failed to seed user bob")?;
    let carol = users
        .create(&NewUser {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            avatar_url: None,
            token: Some("carol-token".to_string()),
        })
        .await
        .context("failed to seed user carol")?;

    messages
        .create_direct(&NewDirectMessage {
            sender_id: alice.id,
            receiver_id: bob.id,
            content: "hey bob, trying out the new backend".to_string(),
            kind: courier_database::MessageKind::Text,
            attachment_urls: Vec::new(),
        })
        .await
        .context("failed to seed direct message")?;

    groups
        .create(&NewGroup {
            name: "weekend plans".to_string(),
            avatar_url: None,
            created_by: alice.id,
            member_ids: vec![alice.id, bob.id, carol.id],
        })
        .await
        .context("failed to seed group")?;

    println!("Database seeded with test data:");
    println!("- 3 users created (tokens: alice-token, bob-token, carol-token)");
    println!("- 1 direct message created");
    println!("- 1 group created");
    println!("Run 'dump-data' to see the inserted data");

    Ok(())
}

/// Shortens message content for table output, cutting on character
/// boundaries so multi-byte content cannot split mid-character.
fn truncate_content(content: String) -> String {
    if content.chars().count() > 37 {
        let cut: String = content.chars().take(34).collect();
        format!("{cut}...")
    } else {
        content
    }
}
