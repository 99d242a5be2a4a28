use crate::app::AppContext;

/// Submit every URL, reporting each outcome. Returns how many succeeded.
pub async fn subscribe_all(ctx: &AppContext, urls: &[String]) -> usize {
    let mut added = 0;
    for url in urls {
        match ctx.submissions.submit(url).await {
            Ok(outcome) => {
                println!(
                    "+ {} ({} posts)",
                    outcome.feed.display_title(),
                    outcome.added
                );
                added += 1;
            }
            Err(e) => {
                eprintln!("! {} - {}", url, ctx.i18n.t(e.message_key()));
            }
        }
    }
    added
}

pub async fn add_feeds(ctx: &AppContext, urls: &[String]) {
    subscribe_all(ctx, urls).await;

    let snapshot = ctx.notifier.snapshot();
    for feed in &snapshot.feeds {
        println!(
            "\n{}\n  {}\n  {}",
            feed.display_title(),
            feed.url,
            ctx.i18n.t_with(
                "unreadCount",
                &[("count", ctx.notifier.unread_count(&feed.url).to_string().as_str())]
            )
        );
        for post in snapshot.posts.iter().filter(|p| p.feed_url == feed.url) {
            println!("  ● {}\n    {}", post.display_title(), post.link);
        }
    }
}

/// Subscribe, then render and poll until Ctrl-C.
pub async fn watch_feeds(ctx: &AppContext, urls: &[String]) -> anyhow::Result<()> {
    let view = ctx.renderer.clone().spawn();

    if subscribe_all(ctx, urls).await == 0 {
        view.abort();
        anyhow::bail!("no feed could be added");
    }

    let poller = ctx.poller.clone().spawn();
    tokio::signal::ctrl_c().await?;

    poller.shutdown().await;
    view.abort();
    Ok(())
}
