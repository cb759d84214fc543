use clap::Parser;
use ink::CanvasSize;
use server::database::{Store, init_redis};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Canvas width used for pages that degrade to empty buffers.
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Report what would change without writing.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let store = Store::Redis(init_redis(&args.redis_url).await?);
    let size = CanvasSize {
        width: args.width,
        height: args.height,
    };

    let report = migrate::migrate_drawings(&store, size, args.dry_run).await?;

    println!("Users: {}", report.users);
    println!("Handwritten Notes: {}", report.handwritten);
    if args.dry_run {
        println!("Would Rewrite: {}", report.rewritten);
    } else {
        println!("Rewritten: {}", report.rewritten);
    }

    Ok(())
}
