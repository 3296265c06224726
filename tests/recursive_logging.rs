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

use std::fmt;

use logsplit::Context;
use logsplit::Logger;
use logsplit::Severity;
use logsplit::append::Buffer;

struct Thing<'a> {
    logger: &'a Logger,
    ctx: &'a Context,
    name: &'a str,
}

impl fmt::Display for Thing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let _ = self
            .logger
            .debugf(self.ctx, format_args!("formatting wrapping ({})", self.name));
        // tagging from inside a payload must not deadlock either
        self.logger.add_tag(self.ctx, "formatted", true);
        f.write_str(self.name)
    }
}

// the logger must not hold any lock while it renders a payload
#[test]
fn test_meta_logging_in_format_works() {
    let out = Buffer::default();
    let (logger, ctx) = Logger::builder()
        .combined(out.clone())
        .threshold(Severity::Debug)
        .disable_timestamps()
        .disable_function_name()
        .build(&Context::background());
    let (_, ctx) = logger.add_tag(&ctx, "depth", 0);

    let thing = Thing {
        logger: &logger,
        ctx: &ctx,
        name: "aha",
    };
    logger
        .infof(&ctx, format_args!("I'm logging {thing}!"))
        .unwrap();

    assert_eq!(
        out.lines(),
        [
            "DEBUG [depth:0] formatting wrapping (aha)",
            "INFO [depth:0] I'm logging aha!",
        ]
    );
    assert!(logger.tag(&ctx, "formatted").is_some());
}
