//! Seed the catalog with sample genres, authors, books and copies.
//!
//! Usage: `populatedb [DATABASE_URL]`. Without an argument the configured
//! store is used. Text is stored escaped, the same as form input.

use anyhow::Context;
use chrono::NaiveDate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use local_library::{
    config::{AppConfig, StoreBackend},
    models::{
        Author, AuthorFields, Book, BookFields, BookInstanceFields, BookInstanceStatus, Genre,
        GenreFields,
    },
    repository::Repository,
    store,
    validation::rules::escape,
};

fn date(value: &str) -> anyhow::Result<Option<NaiveDate>> {
    Ok(Some(
        NaiveDate::parse_from_str(value, "%Y-%m-%d").with_context(|| format!("bad date {}", value))?,
    ))
}

async fn create_genres(repository: &Repository) -> anyhow::Result<Vec<Genre>> {
    let mut genres = Vec::new();
    for name in ["Fantasy", "Science Fiction", "French Poetry"] {
        let genre = repository
            .genres
            .create(GenreFields { name: escape(name) })
            .await?;
        tracing::info!("Added genre: {}", genre.name);
        genres.push(genre);
    }
    Ok(genres)
}

async fn create_authors(repository: &Repository) -> anyhow::Result<Vec<Author>> {
    let rows = [
        ("Patrick", "Rothfuss", date("1973-06-06")?, None),
        ("Ben", "Bova", date("1932-11-08")?, None),
        ("Isaac", "Asimov", date("1920-01-02")?, date("1992-04-06")?),
        ("Bob", "Billings", None, None),
        ("Jim", "Jones", date("1971-12-16")?, None),
    ];

    let mut authors = Vec::new();
    for (first_name, family_name, date_of_birth, date_of_death) in rows {
        let author = repository
            .authors
            .create(AuthorFields {
                first_name: escape(first_name),
                family_name: escape(family_name),
                date_of_birth,
                date_of_death,
            })
            .await?;
        tracing::info!("Added author: {}", author.name());
        authors.push(author);
    }
    Ok(authors)
}

async fn create_books(
    repository: &Repository,
    authors: &[Author],
    genres: &[Genre],
) -> anyhow::Result<Vec<Book>> {
    let rows = [
        (
            "The Name of the Wind (The Kingkiller Chronicle, #1)",
            "I have stolen princesses back from sleeping barrow kings. I burned down the town of Trebon. I have spent the night with Felurian and left with both my sanity and my life. I was expelled from the University at a younger age than most people are allowed in. I tread paths by moonlight that others fear to speak of during day. I have talked to Gods, loved women, and written songs that make the minstrels weep.",
            "9781473211896",
            0,
            Some(0),
        ),
        (
            "The Wise Man's Fear (The Kingkiller Chronicle, #2)",
            "Picking up the tale of Kvothe Kingkiller once again, we follow him into exile, into political intrigue, courtship, adventure, love and magic... and further along the path that has turned Kvothe, the mightiest magician of his age, a legend in his own time, into Kote, the unassuming pub landlord.",
            "9788401352836",
            0,
            Some(0),
        ),
        (
            "The Slow Regard of Silent Things (Kingkiller Chronicle)",
            "Deep below the University, there is a dark place. Few people know of it: a broken web of ancient passageways and abandoned rooms. A young woman lives there, tucked among the sprawling tunnels of the Underthing, snug in the heart of this forgotten place.",
            "9780756411336",
            0,
            Some(0),
        ),
        (
            "Apes and Angels",
            "Humankind headed out to the stars not for conquest, nor exploration, nor even for curiosity. Humans went to the stars in a desperate crusade to save intelligent life wherever they found it. A wave of death is spreading through the Milky Way galaxy, an expanding sphere of lethal gamma ...",
            "9780765379528",
            1,
            Some(1),
        ),
        (
            "Death Wave",
            "In Ben Bova's previous novel New Earth, Jordan Kell led the first human mission beyond the solar system. They discovered the ruins of an ancient alien civilization. But one alien AI survived, and it revealed to Jordan Kell that an explosion in the black hole at the heart of the Milky Way galaxy has created a wave of deadly radiation, expanding out from the core toward Earth. Unless the human race acts to save itself, all life on Earth will be wiped out...",
            "9780765379504",
            1,
            Some(1),
        ),
        ("Test Book 1", "Summary of test book 1", "ISBN111111", 4, Some(0)),
        ("Test Book 2", "Summary of test book 2", "ISBN222222", 4, None),
    ];

    let mut books = Vec::new();
    for (title, summary, isbn, author, genre) in rows {
        let book = repository
            .books
            .create(BookFields {
                title: escape(title),
                summary: escape(summary),
                isbn: escape(isbn),
                author: authors[author].id,
                genre: genre.map(|g: usize| genres[g].id),
            })
            .await?;
        tracing::info!("Added book: {}", book.title);
        books.push(book);
    }
    Ok(books)
}

async fn create_book_instances(repository: &Repository, books: &[Book]) -> anyhow::Result<()> {
    use BookInstanceStatus::*;

    let tor_2016 = "New York Tom Doherty Associates, 2016.";
    let tor_2015 = "New York, NY Tom Doherty Associates, LLC, 2015.";
    let rows = [
        (0, "London Gollancz, 2014.", Some(Available)),
        (1, "Gollancz, 2011.", Some(Loaned)),
        (2, "Gollancz, 2015.", None),
        (3, tor_2016, Some(Available)),
        (3, tor_2016, Some(Available)),
        (3, tor_2016, Some(Available)),
        (4, tor_2015, Some(Available)),
        (4, tor_2015, Some(Maintenance)),
        (4, tor_2015, Some(Loaned)),
        (0, "Imprint XXX2", None),
        (1, "Imprint XXX3", None),
    ];

    for (book, imprint, status) in rows {
        let instance = repository
            .book_instances
            .create(BookInstanceFields {
                book: books[book].id,
                imprint: escape(imprint),
                status: status.unwrap_or_default(),
                due_back: None,
            })
            .await?;
        tracing::info!("Added book instance: {} ({})", instance.imprint, instance.status);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(url) = std::env::args().nth(1) {
        config.database.backend = StoreBackend::Postgres;
        config.database.url = url;
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "populatedb={level},local_library={level}",
            level = config.logging.level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = store::connect(&config.database)
        .await
        .context("Failed to open document store")?;
    let repository = Repository::new(store.clone());

    let genres = create_genres(&repository).await?;
    let authors = create_authors(&repository).await?;
    let books = create_books(&repository, &authors, &genres).await?;
    create_book_instances(&repository, &books).await?;

    tracing::info!("Sample catalog loaded");
    store.close().await;
    Ok(())
}
