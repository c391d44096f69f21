use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use evm_code_analysis::{jump_destinations, Bytecode, Disassembler, MAX_CODE_SIZE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyses legacy EVM bytecode: push data, jump destinations, disassembly.", long_about = None)]
struct Cli {
    /// Hex encoded bytecode, with or without a 0x prefix
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    code: Option<String>,

    /// File holding hex encoded bytecode
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarise which bytes are instructions and which are push data
    Classify {
        /// Print the classification of every offset
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print one instruction per line, skipping push data
    Disasm,
    /// List every valid jump destination
    Jumpdests,
    /// Check whether a jump to DEST would be accepted
    CheckJump {
        /// Destination offset, decimal or 0x-prefixed hex
        dest: String,
    },
}

fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let text: String = text.split_whitespace().collect();
    let text = text.strip_prefix("0x").unwrap_or(text.as_str());
    hex::decode(text).context("invalid hex bytecode")
}

fn parse_offset(text: &str) -> anyhow::Result<usize> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid offset {text}"))
}

fn load_code(cli: &Cli) -> anyhow::Result<Vec<u8>> {
    match (&cli.code, &cli.file) {
        (Some(code), _) => parse_hex(code),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_hex(&text)
        }
        (None, None) => Err(anyhow!("no bytecode given")),
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let code = load_code(&cli)?;
    if code.len() > MAX_CODE_SIZE {
        log::warn!(
            "code is {} bytes, above the {} byte contract size limit",
            code.len(),
            MAX_CODE_SIZE
        );
    }
    let bytecode = Bytecode::new(&code);

    match &cli.command {
        Command::Classify { verbose } => {
            let bitmap = bytecode.bitmap();
            println!("length:       {}", bitmap.len());
            println!("data bytes:   {}", bitmap.data_len());
            println!("instructions: {}", Disassembler::new(&bytecode).count());
            if *verbose {
                for (pc, byte) in code.iter().enumerate() {
                    let kind = if bitmap.is_code(pc) { "code" } else { "data" };
                    println!("0x{pc:04x}: {byte:02x} {kind}");
                }
            }
        }
        Command::Disasm => {
            for ins in Disassembler::new(&bytecode) {
                println!("{ins}");
            }
        }
        Command::Jumpdests => {
            for dest in jump_destinations(&bytecode) {
                println!("0x{dest:04x}");
            }
        }
        Command::CheckJump { dest } => {
            let dest = parse_offset(dest)?;
            if !bytecode.valid_jump_destination(dest) {
                bail!("bad jump destination 0x{dest:04x}");
            }
            println!("0x{dest:04x} is a valid jump destination");
        }
    }

    Ok(())
}
