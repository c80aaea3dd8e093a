use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use feedpages::build::build_site;
use feedpages::config::Config;
use feedpages::fetch::{FeedSource, FileSource, ProxySource};
use feedpages::proxy::{serve, IsahcUpstream};
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_arg = Arg::with_name("config")
        .long("config")
        .short("c")
        .takes_value(true)
        .value_name("DIR")
        .help("Directory to start looking for `feedpages.yaml` in (default: current directory)");

    let matches = App::new("feedpages")
        .version(crate_version!())
        .about("Relays a blog's RSS feed and renders it into a static site")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("generate")
                .about("Fetches the feed and writes post pages, sitemap.xml and robots.txt")
                .arg(config_arg.clone())
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .value_name("DIR")
                        .help("Directory to write the site into (default: current directory)"),
                )
                .arg(
                    Arg::with_name("feed-file")
                        .long("feed-file")
                        .takes_value(true)
                        .value_name("FILE")
                        .help("Read the RSS XML from a local file instead of the proxy"),
                ),
        )
        .subcommand(
            SubCommand::with_name("proxy")
                .about("Serves the upstream feed as JSON with CORS headers")
                .arg(config_arg)
                .arg(
                    Arg::with_name("listen")
                        .long("listen")
                        .short("l")
                        .takes_value(true)
                        .value_name("ADDR")
                        .help("Address to listen on, e.g. 127.0.0.1:8787"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("generate", Some(matches)) => {
            if let Err(e) = generate(matches) {
                eprintln!("Error generating pages: {}", e);
                std::process::exit(1);
            }
        }
        ("proxy", Some(matches)) => {
            if let Err(e) = proxy(matches) {
                eprintln!("Error running proxy: {}", e);
                std::process::exit(1);
            }
        }
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let dir = match matches.value_of("config") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    Config::from_directory(&dir)
}

fn generate(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(matches)?;
    let output_directory = Path::new(matches.value_of("output").unwrap_or("."));

    let proxy_source;
    let file_source;
    let source: &dyn FeedSource = match matches.value_of("feed-file") {
        Some(path) => {
            file_source = FileSource::new(Path::new(path));
            &file_source
        }
        None => {
            proxy_source = ProxySource {
                endpoint: &config.feed_endpoint,
            };
            &proxy_source
        }
    };

    let count = build_site(&config, source, output_directory)?;
    log::info!("All pages generated successfully!");
    println!("Total posts: {}", count);
    Ok(())
}

fn proxy(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut config = load_config(matches)?;
    if let Some(listen) = matches.value_of("listen") {
        config.proxy.listen = listen.to_owned();
    }
    serve(&config.proxy, &IsahcUpstream)?;
    Ok(())
}
