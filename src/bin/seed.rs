use chrono::{Duration, Utc};
use clap::Parser;
use clubhouse::{
    auth::AuthService,
    domain::{
        CreateEventRequest, CreateGalleryItemRequest, CreateProfileRequest, CreateStatRequest,
        CreateTeamMemberRequest, Decision, Profile, Role, SubmitApplicationRequest,
    },
    repository::{
        ApplicationRepository, EventRepository, GalleryRepository, ProfileRepository,
        SqliteApplicationRepository, SqliteEventRepository, SqliteGalleryRepository,
        SqliteProfileRepository, SqliteStatRepository, SqliteTeamRepository, StatRepository,
        TeamRepository,
    },
};
use fake::{
    faker::{lorem::en::Sentence, name::en::Name},
    Fake,
};
use sqlx::sqlite::SqlitePoolOptions;

/// Populate a development database with demo data.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://clubhouse.db?mode=rwc")]
    database_url: String,

    /// Number of approved members to create besides the admin
    #[arg(long, default_value_t = 8)]
    members: usize,

    /// Password given to every seeded account
    #[arg(long, default_value = "password123")]
    password: String,
}

const SKILLS: &[&str] = &["rust", "python", "web", "security", "ml", "embedded", "design"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("Seeding {}", args.database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let profile_repo = SqliteProfileRepository::new(db_pool.clone());
    let application_repo = SqliteApplicationRepository::new(db_pool.clone());
    let event_repo = SqliteEventRepository::new(db_pool.clone());
    let gallery_repo = SqliteGalleryRepository::new(db_pool.clone());
    let stat_repo = SqliteStatRepository::new(db_pool.clone());
    let team_repo = SqliteTeamRepository::new(db_pool.clone());

    let password_hash = AuthService::hash_password(&args.password).await?;

    // The first admin approves their own application.
    let admin = create_account(&profile_repo, &password_hash, "admin@clubhouse.local", "Club Admin").await?;
    let application = application_repo.create(admin.id, application_for(&admin)).await?;
    application_repo.decide(application.id, Decision::Approve, admin.id).await?;
    let admin = profile_repo.set_role(admin.id, Role::Admin).await?;
    println!("  admin: {}", admin.email);

    let mut members = Vec::with_capacity(args.members);
    for i in 0..args.members {
        let name: String = Name().fake();
        let member = create_account(&profile_repo, &password_hash, &format!("member{}@example.com", i + 1), &name).await?;
        let application = application_repo.create(member.id, application_for(&member)).await?;
        application_repo.decide(application.id, Decision::Approve, admin.id).await?;
        members.push(member);
    }
    println!("  {} approved members", members.len());

    // One applicant still under review and one who was turned down.
    let pending = create_account(&profile_repo, &password_hash, "pending@example.com", &Name().fake::<String>()).await?;
    application_repo.create(pending.id, application_for(&pending)).await?;

    let rejected = create_account(&profile_repo, &password_hash, "rejected@example.com", &Name().fake::<String>()).await?;
    let application = application_repo.create(rejected.id, application_for(&rejected)).await?;
    application_repo.decide(application.id, Decision::Reject, admin.id).await?;
    println!("  1 pending and 1 rejected applicant");

    let workshop = event_repo.create(admin.id, CreateEventRequest {
        title: "Intro to Rust Workshop".to_string(),
        description: "Hands-on introduction to ownership, borrowing and cargo.".to_string(),
        event_date: Utc::now() + Duration::days(7),
        location: Some("Engineering Building, Lab 2".to_string()),
        image_url: None,
        max_participants: Some(3),
    }).await?;

    let hack_night = event_repo.create(admin.id, CreateEventRequest {
        title: "Open Hack Night".to_string(),
        description: Sentence(8..16).fake(),
        event_date: Utc::now() + Duration::days(14),
        location: Some("Student Union, Room 120".to_string()),
        image_url: None,
        max_participants: None,
    }).await?;

    event_repo.create(admin.id, CreateEventRequest {
        title: "Spring CTF".to_string(),
        description: "Capture the flag, teams of up to four.".to_string(),
        event_date: Utc::now() + Duration::days(30),
        location: Some("Online".to_string()),
        image_url: None,
        max_participants: Some(40),
    }).await?;

    for member in members.iter().take(2) {
        event_repo.register(workshop.id, member.id).await?;
    }
    for member in &members {
        event_repo.register(hack_night.id, member.id).await?;
    }
    println!("  3 events with registrations");

    for (title, category) in [("Kickoff meeting", "meetings"), ("Hackathon finals", "hackathons"), ("Campus demo day", "showcase")] {
        gallery_repo.create(CreateGalleryItemRequest {
            title: title.to_string(),
            description: Some(Sentence(4..10).fake()),
            image_url: format!("https://picsum.photos/seed/{}/800/600", category),
            category: category.to_string(),
            display_order: None,
        }).await?;
    }

    for (order, (label, value, icon)) in [("Members", 120, "users"), ("Events hosted", 45, "calendar"), ("Projects shipped", 18, "rocket")]
        .into_iter()
        .enumerate()
    {
        stat_repo.create(CreateStatRequest {
            label: label.to_string(),
            value,
            icon: Some(icon.to_string()),
            display_order: Some(order as i32),
        }).await?;
    }

    for (order, role) in ["President", "Vice President", "Treasurer"].into_iter().enumerate() {
        let mut social_links = serde_json::Map::new();
        social_links.insert("github".to_string(), serde_json::Value::String("https://github.com/".to_string()));
        team_repo.create(CreateTeamMemberRequest {
            name: Name().fake(),
            role: role.to_string(),
            description: Some(Sentence(6..12).fake()),
            avatar_url: None,
            expertise: SKILLS.iter().skip(order).take(2).map(|s| s.to_string()).collect(),
            achievements: vec![],
            social_links,
            display_order: Some(order as i32),
        }).await?;
    }
    println!("  gallery, stats and team showcase");

    println!("\nDone. Every seeded account uses the password '{}'.", args.password);
    Ok(())
}

async fn create_account(
    repo: &SqliteProfileRepository,
    password_hash: &str,
    email: &str,
    full_name: &str,
) -> anyhow::Result<Profile> {
    let profile = repo.create(
        CreateProfileRequest {
            email: email.to_string(),
            password: String::new(),
            full_name: full_name.to_string(),
        },
        password_hash,
    ).await?;
    Ok(profile)
}

fn application_for(profile: &Profile) -> SubmitApplicationRequest {
    let skills: Vec<String> = SKILLS
        .iter()
        .skip(profile.full_name.len() % SKILLS.len())
        .take(3)
        .map(|s| s.to_string())
        .collect();

    SubmitApplicationRequest {
        email: profile.email.clone(),
        full_name: profile.full_name.clone(),
        motivation: Sentence(10..20).fake(),
        experience: Some(Sentence(5..10).fake()),
        skills,
        github_username: None,
        linkedin_username: None,
    }
}
