use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tpe_core::{QueryParams, SaveDir, TagPath, TreeProvider, WorldSelector};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tpe",
    about = "Read, edit and check tag values in world saves via dotted paths",
    version
)]
struct Cli {
    #[command(flatten)]
    saves: SavesArgs,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(ClapArgs, Debug)]
struct SavesArgs {
    /// Directory holding one folder per world
    #[arg(long, global = true, env = "TPE_SAVES_DIR", default_value = "saves")]
    saves: PathBuf,
    /// Folder name of the active world, addressed as "current"
    #[arg(long, global = true, env = "TPE_CURRENT_WORLD")]
    current: Option<String>,
    /// Zip the world folder before every save
    #[arg(long, global = true, env = "TPE_BACKUP", default_value_t = false)]
    backup: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List worlds in the saves directory
    Worlds,
    /// Print the value at a path, or a default when absent
    Get(GetArgs),
    /// Set a value: "world|path|value|type" (type optional, defaults to auto)
    ///
    /// Examples: "My World|Data.LevelName|New Name", "My World|Data.GameType|1|int"
    Set(SpecArgs),
    /// Check a value: "world|path|operator|value"; exits 1 when not met
    ///
    /// Operators: == != > < >= <= contains
    Check(SpecArgs),
    /// Resolve a JSON placeholder, e.g. {"placeholder":"nbt_value","values":{"path":"Data.LevelName"}}
    Placeholder(PlaceholderArgs),
    /// Dump a world tree (or a subtree) as JSON
    Dump(DumpArgs),
    /// List children of a container
    Ls(LsArgs),
}

#[derive(ClapArgs, Debug)]
struct GetArgs {
    /// World display name, folder name, or "current"
    world: String,
    /// Dotted path, e.g. Data.LevelName
    path: String,
    /// Text printed when the value is absent
    #[arg(long, default_value = "null")]
    default: String,
}

#[derive(ClapArgs, Debug)]
struct SpecArgs {
    /// Pipe-delimited specification
    spec: String,
}

#[derive(ClapArgs, Debug)]
struct PlaceholderArgs {
    /// Placeholder JSON or a bare {"world","path","default"} object
    json: String,
}

#[derive(ClapArgs, Debug)]
struct DumpArgs {
    /// World display name, folder name, or "current"
    world: String,
    /// Optional dotted path of the subtree to dump
    #[arg(long)]
    path: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct LsArgs {
    /// World display name, folder name, or "current"
    world: String,
    /// Dotted path of the container; the root when omitted
    path: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tpe_core=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let saves = SaveDir::new(cli.saves.saves)
        .with_current(cli.saves.current)
        .with_backup(cli.saves.backup);
    match cli.cmd.unwrap_or(Cmd::Worlds) {
        Cmd::Worlds => cmd_worlds(&saves),
        Cmd::Get(a) => cmd_get(&saves, a),
        Cmd::Set(a) => cmd_set(&saves, a),
        Cmd::Check(a) => cmd_check(&saves, a),
        Cmd::Placeholder(a) => cmd_placeholder(&saves, a),
        Cmd::Dump(a) => cmd_dump(&saves, a),
        Cmd::Ls(a) => cmd_ls(&saves, a),
    }
}

fn cmd_worlds(saves: &SaveDir) {
    let worlds = saves.worlds();
    if worlds.is_empty() {
        eprintln!("no worlds in {}", saves.root().display());
        return;
    }
    for w in worlds {
        println!("{}\t{}", w.folder_name(), w.display_name().unwrap_or("<unnamed>"));
    }
}

fn cmd_get(saves: &SaveDir, args: GetArgs) {
    let params = QueryParams::new(args.path)
        .world(args.world)
        .default_value(args.default);
    println!("{}", tpe_core::query_value(saves, &params));
}

fn cmd_set(saves: &SaveDir, args: SpecArgs) {
    match tpe_core::set_value(saves, &args.spec) {
        Ok(outcome) => println!("Value changed: {}", outcome),
        Err(_) => std::process::exit(4),
    }
}

fn cmd_check(saves: &SaveDir, args: SpecArgs) {
    let met = tpe_core::check_requirement(saves, &args.spec);
    println!("{}", met);
    if !met {
        std::process::exit(1);
    }
}

fn cmd_placeholder(saves: &SaveDir, args: PlaceholderArgs) {
    let params = QueryParams::from_json(&args.json).unwrap_or_else(|e| {
        eprintln!("invalid placeholder JSON: {}", e);
        std::process::exit(3);
    });
    println!("{}", tpe_core::query_value(saves, &params));
}

fn open_world(saves: &SaveDir, world: &str) -> tpe_core::World {
    match saves.resolve(&WorldSelector::parse(world)) {
        Ok(Some(w)) => w,
        Ok(None) => {
            eprintln!("world not found: {}", world);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

fn parse_path(text: &str) -> TagPath {
    TagPath::parse(text).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(3);
    })
}

fn cmd_dump(saves: &SaveDir, args: DumpArgs) {
    let world = open_world(saves, &args.world);
    let out = match args.path.as_deref().map(parse_path) {
        None => serde_json::to_string_pretty(world.root()),
        Some(p) => match tpe_core::read(world.root(), &p) {
            Some(node) => serde_json::to_string_pretty(node),
            None => {
                eprintln!("not found: {}", p);
                std::process::exit(3);
            }
        },
    };
    match out {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

fn cmd_ls(saves: &SaveDir, args: LsArgs) {
    let world = open_world(saves, &args.world);
    let path = args.path.as_deref().map(parse_path);
    match tpe_core::children(world.root(), path.as_ref()) {
        Some(children) => {
            for c in children {
                println!(
                    "{}\t{}{}",
                    c.key_or_index,
                    c.kind,
                    c.len.map(|n| format!("\t(len={})", n)).unwrap_or_default()
                );
            }
        }
        None => {
            eprintln!("not found: {}", args.path.unwrap_or_default());
            std::process::exit(3);
        }
    }
}
