// Native binary for hivex - terminal feed viewer

use anyhow::{anyhow, bail, Context, Result};

use hivex::{
    config::{load, Command, Config},
    detail::fetch_post_detail,
    profile::fetch_user_profile,
    router::{self, Route, RouteV1},
    session::{ApplyOutcome, FeedSession, SearchSession},
    types::Post,
    util_text::{excerpt, format_date, format_payout, format_vote_weight},
    DiscussionPager, FirstPostFinder, FirstPostSearch, HiveApi, HttpTransport, SortMode,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let (cfg, command) = load().context("Failed to load configuration")?;
    if log::log_enabled!(log::Level::Debug) {
        cfg.print_summary();
    }

    let api = HiveApi::new(HttpTransport::from_config(&cfg));

    // Ctrl+C abandons whatever request is in flight; its response is never applied.
    tokio::select! {
        res = run(&cfg, &api, command) => res,
        _ = tokio::signal::ctrl_c() => {
            log::warn!("interrupted");
            Ok(())
        }
    }
}

async fn run(cfg: &Config, api: &HiveApi<HttpTransport>, command: Command) -> Result<()> {
    match command {
        Command::Feed { sort, pages } => {
            run_feed(cfg, api, sort.unwrap_or_default(), &cfg.tag, pages).await
        }
        Command::FirstPost { username } => run_first_post(cfg, api, &username).await,
        Command::Post { author, permlink } => run_post(api, &author, &permlink).await,
        Command::User { username, limit } => run_user(api, &username, limit).await,
        Command::Open { route } => {
            let parsed =
                router::parse(&route).ok_or_else(|| anyhow!("Unrecognized link: {route}"))?;
            log::info!("Opening {}", parsed.to_url());
            match parsed {
                Route::V1(RouteV1::Feed { sort, tag }) => {
                    let tag = tag.unwrap_or_else(|| cfg.tag.clone());
                    run_feed(cfg, api, sort.unwrap_or_default(), &tag, 1).await
                }
                Route::V1(RouteV1::Post { author, permlink }) => {
                    run_post(api, &author, &permlink).await
                }
                Route::V1(RouteV1::User { name }) => {
                    run_user(api, &name, hivex::profile::DEFAULT_BLOG_LIMIT).await
                }
                Route::V1(RouteV1::FirstPost { name }) => run_first_post(cfg, api, &name).await,
            }
        }
    }
}

async fn run_feed(
    cfg: &Config,
    api: &HiveApi<HttpTransport>,
    sort: SortMode,
    tag: &str,
    pages: u32,
) -> Result<()> {
    let pager = DiscussionPager::new(api);
    let mut session = FeedSession::new(sort, tag, cfg.page_size);

    let token = session.begin_refresh();
    let first = pager
        .fetch_page(session.sort(), session.tag(), session.page_size(), None)
        .await;
    if session.apply(token, first) == ApplyOutcome::Failed {
        bail!(
            "Failed to load posts: {}",
            session.last_error().unwrap_or("unknown error")
        );
    }

    for _ in 1..pages.max(1) {
        let Some((token, cursor)) = session.begin_load_more() else {
            break;
        };
        let page = pager
            .fetch_page(session.sort(), session.tag(), session.page_size(), Some(&cursor))
            .await;
        if session.apply(token, page) == ApplyOutcome::Failed {
            bail!(
                "Failed to load more posts: {}",
                session.last_error().unwrap_or("unknown error")
            );
        }
    }

    let label = if session.tag().is_empty() {
        "all tags".to_string()
    } else {
        format!("#{}", session.tag())
    };
    println!("{} · {}", label, session.sort());
    if let Some(at) = session.last_updated() {
        println!("Last updated: {}", format_date(&at));
    }
    println!();

    if session.posts().is_empty() {
        println!("No posts found.");
        return Ok(());
    }
    for (i, post) in session.posts().iter().enumerate() {
        print_card(i + 1, post);
    }
    println!(
        "{} posts loaded · {} unique authors{}",
        session.loaded_count(),
        session.unique_authors(),
        if session.has_more() {
            " · more available (--pages)"
        } else {
            ""
        }
    );
    Ok(())
}

async fn run_first_post(cfg: &Config, api: &HiveApi<HttpTransport>, username: &str) -> Result<()> {
    let mut search = SearchSession::new();
    let Some((token, term)) = search.begin_search(username) else {
        bail!("Enter a username to search");
    };

    let result = FirstPostFinder::new(api)
        .with_limits(cfg.first_post_page_size, cfg.first_post_max_rounds)
        .find_first_post(&term)
        .await;
    if search.apply(token, result) == ApplyOutcome::Failed {
        bail!(
            "Failed to search first post: {}. Check that the account exists.",
            search.last_error().unwrap_or("unknown error")
        );
    }

    match search.result() {
        Some(FirstPostSearch::Found {
            post,
            distinct,
            rounds,
            capped,
            ..
        }) => {
            println!(
                "First post of @{} (searched {} posts in {} rounds)",
                term, distinct, rounds
            );
            if *capped {
                println!(
                    "Note: only the latest {distinct} posts were scanned; older ones may exist."
                );
            }
            println!();
            print_full(post);
        }
        _ => println!("No posts found for @{term}."),
    }
    Ok(())
}

async fn run_post(api: &HiveApi<HttpTransport>, author: &str, permlink: &str) -> Result<()> {
    let author = author.trim_start_matches('@');
    let Some(detail) = fetch_post_detail(api, author, permlink)
        .await
        .with_context(|| format!("Failed to load post @{author}/{permlink}"))?
    else {
        println!("Post not found: @{author}/{permlink}");
        return Ok(());
    };

    print_full(&detail.post);
    println!();
    println!("── {} comments ──", detail.comments.len());
    for c in &detail.comments {
        println!();
        println!(
            "@{} ({}) · {}",
            c.author,
            c.author_display_name,
            format_date(&c.created)
        );
        println!("{}", c.body.trim());
    }
    Ok(())
}

async fn run_user(api: &HiveApi<HttpTransport>, username: &str, limit: u32) -> Result<()> {
    let Some(profile) = fetch_user_profile(api, username, limit)
        .await
        .with_context(|| format!("Failed to load profile @{username}"))?
    else {
        println!("Profile not found: @{}", username.trim_start_matches('@'));
        return Ok(());
    };

    let a = &profile.account;
    println!("{} (@{}) · reputation {}", a.display_name, a.username, a.reputation);
    println!("{}", a.avatar_url);
    if !a.about.is_empty() {
        println!("{}", a.about);
    }
    println!("https://hive.blog/@{}", a.username);
    println!();

    if profile.posts.is_empty() {
        println!("No posts found for this user.");
        return Ok(());
    }
    for (i, post) in profile.posts.iter().enumerate() {
        print_card(i + 1, post);
    }
    Ok(())
}

fn print_card(n: usize, post: &Post) {
    println!("{n:>3}. {}", post.title);
    println!(
        "     @{} ({}) · {} · {} comments · {} votes · {}",
        post.author,
        post.author_display_name,
        format_date(&post.created),
        post.replies,
        format_vote_weight(post.vote_weight()),
        format_payout(&post.pending_payout_value)
    );
    println!("     {}", excerpt(post.body.trim(), 120).replace('\n', " "));
    println!("     {}", post.url);
    println!();
}

fn print_full(post: &Post) {
    println!("{}", post.title);
    println!("by @{} ({})", post.author, post.author_display_name);
    println!(
        "{} · {} comments · {} votes · {}",
        format_date(&post.created),
        post.replies,
        format_vote_weight(post.vote_weight()),
        format_payout(&post.pending_payout_value)
    );
    println!("{}", post.url);
    println!();
    println!("{}", post.body.trim());
}
