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
use logsplit::TagValue;
use logsplit::append::Buffer;

fn logger() -> (Logger, Context, Buffer) {
    let out = Buffer::default();
    let (logger, ctx) = Logger::builder()
        .out(out.clone())
        .disable_timestamps()
        .disable_function_name()
        .build(&Context::background());
    (logger, ctx, out)
}

#[test]
fn test_last_write_wins() {
    let (logger, mut ctx, _) = logger();

    for (i, name) in ["waffles", "bacon", "waffles"].into_iter().enumerate() {
        (_, ctx) = logger.add_tag(&ctx, name, i as i64 + 1);
    }

    let tags = logger.tags(&ctx);
    assert_eq!(tags.len(), 2);
    assert_eq!(logger.tag(&ctx, "bacon").unwrap().as_value().to_i64(), Some(2));
    assert_eq!(logger.tag(&ctx, "waffles").unwrap().as_value().to_i64(), Some(3));
    assert_eq!(tags.to_string(), "[bacon:2, waffles:3]");
}

#[test]
fn test_add_then_remove() {
    let (logger, ctx, out) = logger();

    let (tags, ctx) = logger.add_tag(&ctx, "request", "r-17");
    assert_eq!(tags.get("request"), Some(&TagValue::from("r-17")));
    logger.info(&ctx, &[&"tagged"]).unwrap();

    let (tags, ctx) = logger.remove_tag(&ctx, "request");
    assert!(tags.is_empty());
    assert!(logger.tag(&ctx, "request").is_none());
    logger.info(&ctx, &[&"untagged"]).unwrap();

    assert_eq!(out.lines(), ["INFO [request:r-17] tagged", "INFO untagged"]);
}

#[test]
fn test_repeated_add_is_idempotent() {
    let (logger, ctx, _) = logger();

    let (first, ctx) = logger.add_tag(&ctx, "attempt", 1);
    let (second, ctx) = logger.add_tag(&ctx, "attempt", 1);
    assert_eq!(first, second);
    assert_eq!(logger.tags(&ctx).len(), 1);
}

#[test]
fn test_empty_name_is_ignored() {
    let (logger, ctx, _) = logger();

    let (tags, derived) = logger.add_tag(&ctx, "", 1);
    assert!(tags.is_empty());
    assert!(logger.tags(&derived).is_empty());

    let (_, ctx) = logger.add_tag(&ctx, "kept", 1);
    let (tags, ctx) = logger.remove_tag(&ctx, "");
    assert_eq!(tags.len(), 1);
    assert_eq!(logger.tags(&ctx).len(), 1);
}

#[test]
fn test_remove_without_tags() {
    let (logger, ctx, _) = logger();

    let (tags, ctx) = logger.remove_tag(&ctx, "missing");
    assert!(tags.is_empty());
    assert!(logger.tags(&ctx).is_empty());
}

#[test]
fn test_derived_contexts_share_tags() {
    let (logger, ctx, out) = logger();

    let (_, parent) = logger.add_tag(&ctx, "service", "billing");
    let child = parent.with_value("span", 3u32);
    let (_, child) = logger.add_tag(&child, "user", "alice");

    // the store created for `parent` is shared with everything derived from it
    assert_eq!(logger.tags(&parent).len(), 2);
    assert!(logger.tags(&ctx).is_empty());

    logger.info(&child, &[&"hello"]).unwrap();
    assert_eq!(out.contents(), "INFO [service:billing, user:alice] hello\n");
}

#[test]
fn test_separate_keys_keep_separate_tags() {
    let out = Buffer::default();
    let (first, ctx) = Logger::builder()
        .out(out.clone())
        .disable_timestamps()
        .build(&Context::background());
    let (second, ctx) = Logger::builder()
        .out(out.clone())
        .disable_timestamps()
        .tags_context_key("audit")
        .build(&ctx);

    let (_, ctx) = first.add_tag(&ctx, "request", 1);
    let (_, ctx) = second.add_tag(&ctx, "actor", "root");

    first.info(&ctx, &[&"a"]).unwrap();
    second.info(&ctx, &[&"b"]).unwrap();
    assert_eq!(out.lines(), ["INFO [request:1] a", "INFO [actor:root] b"]);
}

#[test]
fn test_tag_value_kinds() {
    let (logger, ctx, out) = logger();

    let (_, ctx) = logger.add_tag(&ctx, "ok", true);
    let (_, ctx) = logger.add_tag(&ctx, "ratio", 0.5);
    let (_, ctx) = logger.add_tag(&ctx, "grade", 'A');
    let addr = TagValue::from_display(std::net::Ipv4Addr::LOCALHOST);
    let (_, ctx) = logger.add_tag(&ctx, "addr", addr);

    logger.info(&ctx, &[]).unwrap();
    assert_eq!(out.contents(), "INFO [addr:127.0.0.1, grade:A, ok:true, ratio:0.5]\n");
    assert_eq!(logger.tag(&ctx, "ok").unwrap().as_value().to_bool(), Some(true));
}
