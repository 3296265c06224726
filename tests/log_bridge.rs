// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use logsplit::Context;
use logsplit::Logger;
use logsplit::Severity;
use logsplit::append::Buffer;
use logsplit::bridge::LogBridge;

// the global logger can be installed once per process, so this file has a single test
#[test]
fn test_log_crate_records_are_forwarded() {
    let out = Buffer::default();
    let err = Buffer::default();
    let (logger, ctx) = Logger::builder()
        .out(out.clone())
        .err(err.clone())
        .threshold(Severity::Info)
        .disable_timestamps()
        .build(&Context::background());
    let (_, ctx) = logger.add_tag(&ctx, "service", "billing");

    LogBridge::new(logger)
        .context(ctx)
        .filter("debug,log_bridge::noisy=error")
        .unwrap()
        .try_apply()
        .unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Info);

    log::info!("charged {} cents", 250);
    log::warn!("card expires soon");
    log::debug!("below threshold");
    log::info!(target: "log_bridge::noisy", "filtered by target");

    assert_eq!(out.contents(), "INFO log_bridge [service:billing] charged 250 cents\n");
    assert_eq!(err.contents(), "WARN log_bridge [service:billing] card expires soon\n");
}
