use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use fclink_wire::{BlockPayload, LogBlock};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct BlockOutput<'a> {
    #[serde(flatten)]
    block: &'a LogBlock,
    wire_size: usize,
}

pub fn print_block(block: &LogBlock, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = BlockOutput {
                block,
                wire_size: block.wire_size(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "TYPE", "TIMESTAMP", "PAYLOAD"])
                .add_row(vec![
                    block.header.id.to_string(),
                    format!("{:?}", block.header.block_type),
                    block.header.timestamp.to_string(),
                    payload_summary(&block.payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "[{}] t={} {:?} {}",
                block.header.id,
                block.header.timestamp,
                block.header.block_type,
                payload_summary(&block.payload)
            );
        }
    }
}

fn payload_summary(payload: &BlockPayload) -> String {
    match payload {
        BlockPayload::ControlLoop(data) => format!(
            "gyro=({}, {}, {})",
            data.raw_gyro_x, data.raw_gyro_y, data.raw_gyro_z
        ),
    }
}
