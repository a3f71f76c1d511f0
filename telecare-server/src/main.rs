// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use telecare_diagnosis::EncoderMode;
use telecare_server::{config::ServerConfig, run_server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, env = "TELECARE_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP listen address (overrides config file)
    #[arg(long, env = "TELECARE_HTTP_ADDR")]
    http_addr: Option<String>,

    /// Dense network artifact (overrides config file)
    #[arg(long, env = "TELECARE_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Feature encoding: presence or severity_weighted
    #[arg(long, env = "TELECARE_ENCODER")]
    encoder: Option<EncoderMode>,

    /// Refuse to start without a verified model
    #[arg(long, env = "TELECARE_REQUIRE_BACKEND")]
    require_backend: bool,

    /// Emit logs as JSON
    #[arg(long, env = "TELECARE_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = ServerConfig::load(args.config)?;

    // Apply CLI overrides
    if let Some(addr) = args.http_addr {
        config.server.listen_addr = addr;
    }
    if let Some(model) = args.model {
        config.engine.model_path = Some(model);
    }
    if let Some(encoder) = args.encoder {
        config.engine.encoder = encoder;
    }
    if args.require_backend {
        config.engine.require_backend = true;
    }
    if args.log_json {
        config.server.log_json = true;
    }

    // Run server
    run_server(config).await
}
