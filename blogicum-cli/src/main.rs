use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use blogicum_client::{
    AuthResponse, BlogClient, BlogClientError, Category, Comment, Location, NewPost, Post,
    PostPage, PostUpdate, ProfileUpdate, User,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

const TOKEN_FILE: &str = ".blogicum_token";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:8080";
const SERVER_ENV: &str = "BLOGICUM_SERVER";

#[derive(Debug, Parser)]
#[command(name = "blogicum-cli", version, about = "CLI клиент для blogicum-server")]
struct Cli {
    /// Адрес сервера; по умолчанию `BLOGICUM_SERVER` или http://127.0.0.1:8080.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Лента опубликованных постов.
    List {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Пост с комментариями.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Создание поста (требует токен).
    ///
    /// Дата в будущем делает пост отложенным; такой пост публикуется всегда.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        category_id: i64,
        #[arg(long)]
        location_id: Option<i64>,
        #[arg(long)]
        image: Option<String>,
        /// Дата публикации в формате RFC 3339.
        #[arg(long)]
        pub_date: Option<DateTime<Utc>>,
        /// Сохранить как черновик (не действует для отложенных постов).
        #[arg(long)]
        draft: bool,
    },
    /// Обновление поста (требует токен).
    ///
    /// Неуказанные поля берутся из текущей версии поста.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long)]
        location_id: Option<i64>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        pub_date: Option<DateTime<Utc>>,
        #[arg(long)]
        published: Option<bool>,
    },
    /// Удаление поста (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Комментарий к посту (требует токен).
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        text: String,
    },
    /// Изменение своего комментария (требует токен).
    EditComment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        comment_id: i64,
        #[arg(long)]
        text: String,
    },
    /// Удаление своего комментария (требует токен).
    DeleteComment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        comment_id: i64,
    },
    /// Посты категории.
    Category {
        #[arg(long)]
        slug: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Профиль пользователя и его посты.
    Profile {
        #[arg(long)]
        username: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Изменение своего профиля (требует токен).
    EditProfile {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// Опубликованные категории.
    Categories,
    /// Опубликованные местоположения.
    Locations,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = BlogClient::new(server).map_err(map_client_error)?;

    if let Some(token) = load_token().context("не удалось прочитать .blogicum_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = client
                .register(&username, &email, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Регистрация успешна", &auth);
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Вход выполнен", &auth);
        }
        Command::List { limit, offset } => {
            let page = client
                .list_posts(limit, offset)
                .await
                .map_err(map_client_error)?;
            print_page(&page);
        }
        Command::Get { id } => {
            let detail = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Пост", &detail.post);
            print_comments(&detail.comments);
        }
        Command::Create {
            title,
            text,
            category_id,
            location_id,
            image,
            pub_date,
            draft,
        } => {
            let new_post = NewPost {
                title,
                text,
                image,
                pub_date,
                is_published: draft.then_some(false),
                category_id,
                location_id,
            };
            let post = client
                .create_post(&new_post)
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        Command::Update {
            id,
            title,
            text,
            category_id,
            location_id,
            image,
            pub_date,
            published,
        } => {
            let current = client.get_post(id).await.map_err(map_client_error)?.post;
            let mut update = PostUpdate::from(current);
            if let Some(title) = title {
                update.title = title;
            }
            if let Some(text) = text {
                update.text = text;
            }
            if let Some(category_id) = category_id {
                update.category_id = category_id;
            }
            if let Some(location_id) = location_id {
                update.location_id = Some(location_id);
            }
            if let Some(image) = image {
                update.image = Some(image);
            }
            if let Some(pub_date) = pub_date {
                update.pub_date = pub_date;
            }
            if let Some(published) = published {
                update.is_published = published;
            }

            let post = client
                .update_post(id, &update)
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        Command::Comment { post_id, text } => {
            let comment = client
                .add_comment(post_id, &text)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий добавлен");
            print_comments(std::slice::from_ref(&comment));
        }
        Command::EditComment {
            post_id,
            comment_id,
            text,
        } => {
            let comment = client
                .update_comment(post_id, comment_id, &text)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий обновлён");
            print_comments(std::slice::from_ref(&comment));
        }
        Command::DeleteComment {
            post_id,
            comment_id,
        } => {
            client
                .delete_comment(post_id, comment_id)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий удалён: id={comment_id}");
        }
        Command::Category {
            slug,
            limit,
            offset,
        } => {
            let result = client
                .category_posts(&slug, limit, offset)
                .await
                .map_err(map_client_error)?;
            print_category(&result.category);
            print_page(&result.page);
        }
        Command::Profile {
            username,
            limit,
            offset,
        } => {
            let profile = client
                .get_profile(&username, limit, offset)
                .await
                .map_err(map_client_error)?;
            println!("Профиль: {}", profile.user.username);
            println!(
                "  имя: {} {}",
                profile.user.first_name, profile.user.last_name
            );
            println!("  с нами с: {}", profile.user.created_at);
            print_page(&profile.posts);
        }
        Command::EditProfile {
            username,
            email,
            first_name,
            last_name,
        } => {
            let user = client
                .update_profile(&ProfileUpdate {
                    username,
                    email,
                    first_name,
                    last_name,
                })
                .await
                .map_err(map_client_error)?;
            print_user("Профиль обновлён", &user);
        }
        Command::Categories => {
            let categories = client.list_categories().await.map_err(map_client_error)?;
            for category in &categories {
                print_category(category);
            }
        }
        Command::Locations => {
            let locations = client.list_locations().await.map_err(map_client_error)?;
            print_locations(&locations);
        }
    }

    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &BlogClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn map_client_error(err: BlogClientError) -> anyhow::Error {
    let message = match err {
        BlogClientError::Unauthorized => {
            "требуется авторизация: выполните `blogicum-cli login ...` или `blogicum-cli register ...`"
                .to_string()
        }
        BlogClientError::Forbidden => "можно изменять только свои посты и комментарии".to_string(),
        BlogClientError::NotFound => "ресурс не найден".to_string(),
        BlogClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        BlogClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn post_state(post: &Post, now: DateTime<Utc>) -> &'static str {
    if !post.is_published {
        "черновик"
    } else if post.pub_date > now {
        "отложен"
    } else {
        "опубликован"
    }
}

fn print_user(title: &str, user: &User) {
    println!("{title}");
    println!("  id: {}", user.id);
    println!("  username: {}", user.username);
    println!("  email: {}", user.email);
    println!("  имя: {} {}", user.first_name, user.last_name);
    println!("  created_at: {}", user.created_at);
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("token: {}", auth.access_token);
    print_user(title, &auth.user);
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("text: {}", post.text);
    println!("author: {}", post.author.username);
    println!("category: {}", post.category.slug);
    if let Some(location) = &post.location {
        println!("location: {}", location.name);
    }
    if let Some(image) = &post.image {
        println!("image: {image}");
    }
    println!("pub_date: {}", post.pub_date);
    println!("state: {}", post_state(post, Utc::now()));
}

fn print_comments(comments: &[Comment]) {
    for comment in comments {
        println!(
            "  #{} {} ({}): {}",
            comment.id, comment.author.username, comment.created_at, comment.text
        );
    }
}

fn print_page(page: &PostPage) {
    println!(
        "Постов: {} (limit={}, offset={}, total={})",
        page.items.len(),
        page.limit,
        page.offset,
        page.total
    );

    let now = Utc::now();
    for item in &page.items {
        println!(
            "- [{}] {} (author={}, comments={}, {})",
            item.post.id,
            item.post.title,
            item.post.author.username,
            item.comment_count,
            post_state(&item.post, now)
        );
    }
}

fn print_category(category: &Category) {
    println!("- {} [{}]: {}", category.title, category.slug, category.description);
}

fn print_locations(locations: &[Location]) {
    for location in locations {
        println!("- [{}] {}", location.id, location.name);
    }
}
