//! Tests for the melding handler's output.

#[cfg(test)]
mod tests {
    use crate::attr::Attr;
    use crate::handler::{JsonSink, Level, Meld, Record, Sink, TextSink};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::io::{self, Write};
    use std::sync::Arc;
    use std::thread;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn text_handler() -> (Meld, SharedBuf) {
        let buf = SharedBuf::default();
        let sink: Arc<dyn Sink> = Arc::new(TextSink::new(buf.clone(), Level::Debug));
        (Meld::new(sink), buf)
    }

    fn json_handler() -> (Meld, SharedBuf) {
        let buf = SharedBuf::default();
        let sink: Arc<dyn Sink> = Arc::new(JsonSink::new(buf.clone(), Level::Debug));
        (Meld::new(sink), buf)
    }

    fn alice_twice(log: &Meld) -> Meld {
        log.with_attrs(&[Attr::group(
            "alice",
            vec![Attr::new("foo", "goo"), Attr::new("bar", "baz")],
        )])
        .unwrap()
        .with_attrs(&[Attr::group(
            "alice",
            vec![Attr::new("foo", "boo"), Attr::new("qux", "quux")],
        )])
        .unwrap()
    }

    /// Test case for the text output of a handler chain.
    struct HandlerTestCase {
        name: &'static str,
        mock: fn(&Meld),
        expected: &'static str,
    }

    fn run_handler_test_case(tc: HandlerTestCase) {
        let (log, buf) = text_handler();
        (tc.mock)(&log);
        assert_eq!(buf.contents(), tc.expected, "output mismatch for {}", tc.name);
    }

    #[test]
    fn test_handler_cases() {
        let cases = vec![
            HandlerTestCase {
                name: "no attributes",
                expected: "level=INFO msg=hello_world\n",
                mock: |log| log.log(Level::Info, "hello_world", vec![]).unwrap(),
            },
            HandlerTestCase {
                name: "with scalar",
                expected: "level=INFO msg=hello_world foo=bar\n",
                mock: |log| {
                    log.with_attrs(&[Attr::new("foo", "bar")])
                        .unwrap()
                        .log(Level::Info, "hello_world", vec![])
                        .unwrap()
                },
            },
            HandlerTestCase {
                name: "replace scalar",
                expected: "level=INFO msg=hello_world foo=baz\n",
                mock: |log| {
                    let log1 = log.with_attrs(&[Attr::new("foo", "bar")]).unwrap();
                    let log2 = log1.with_attrs(&[Attr::new("foo", "baz")]).unwrap();
                    log2.log(Level::Info, "hello_world", vec![]).unwrap();
                },
            },
            HandlerTestCase {
                name: "merge groups",
                expected: "level=INFO msg=hello_world alice.foo=boo alice.bar=baz alice.qux=quux bob=lorem_ipsum\n",
                mock: |log| {
                    let log3 = alice_twice(log)
                        .with_attrs(&[Attr::new("bob", "lorem_ipsum")])
                        .unwrap();
                    log3.log(Level::Info, "hello_world", vec![]).unwrap();
                },
            },
            HandlerTestCase {
                name: "scalar replaced by group",
                expected: "level=INFO msg=hello_world alice.foo=boo alice.qux=quux bob=lorem_ipsum\n",
                mock: |log| {
                    let log1 = log.with_attrs(&[Attr::new("alice", "snafu")]).unwrap();
                    let log2 = log1
                        .with_attrs(&[Attr::group(
                            "alice",
                            vec![Attr::new("foo", "boo"), Attr::new("qux", "quux")],
                        )])
                        .unwrap();
                    let log3 = log2.with_attrs(&[Attr::new("bob", "lorem_ipsum")]).unwrap();
                    log3.log(Level::Info, "hello_world", vec![]).unwrap();
                },
            },
            HandlerTestCase {
                name: "record attributes",
                expected: "level=INFO msg=hello_world alice.foo=boo alice.bar=baz alice.qux=quux bob=lorem_ipsum\n",
                mock: |log| {
                    alice_twice(log)
                        .log(Level::Info, "hello_world", vec![Attr::new("bob", "lorem_ipsum")])
                        .unwrap();
                },
            },
            HandlerTestCase {
                name: "record attributes in group",
                expected: "level=INFO msg=hello_world alice.foo=boo alice.bar=baz alice.qux=quux bob.foo=lorem_ipsum\n",
                mock: |log| {
                    let log3 = alice_twice(log).with_group("bob").unwrap();
                    log3.log(Level::Info, "hello_world", vec![Attr::new("foo", "lorem_ipsum")])
                        .unwrap();
                },
            },
            HandlerTestCase {
                name: "group replaced by scalar",
                expected: "level=INFO msg=hello_world alice=newtext bob.foo=lorem_ipsum\n",
                mock: |log| {
                    let log2a = alice_twice(log)
                        .with_attrs(&[Attr::new("alice", "newtext")])
                        .unwrap();
                    let log3 = log2a.with_group("bob").unwrap();
                    log3.log(Level::Info, "hello_world", vec![Attr::new("foo", "lorem_ipsum")])
                        .unwrap();
                },
            },
            HandlerTestCase {
                name: "empty group is omitted",
                expected: "level=INFO msg=hello_world a=1\n",
                mock: |log| {
                    let log1 = log.with_attrs(&[Attr::new("a", 1)]).unwrap();
                    log1.with_group("g").unwrap().log(Level::Info, "hello_world", vec![]).unwrap();
                },
            },
            HandlerTestCase {
                name: "empty group name is ignored",
                expected: "level=INFO msg=hello_world a=1\n",
                mock: |log| {
                    let log1 = log.with_group("").unwrap();
                    log1.log(Level::Info, "hello_world", vec![Attr::new("a", 1)]).unwrap();
                },
            },
            HandlerTestCase {
                name: "group over scalar",
                expected: "level=INFO msg=hello_world req.id=7\n",
                mock: |log| {
                    let log1 = log.with_attrs(&[Attr::new("req", "flat")]).unwrap();
                    let log2 = log1.with_group("req").unwrap();
                    log2.log(Level::Info, "hello_world", vec![Attr::new("id", 7)]).unwrap();
                },
            },
        ];

        for tc in cases {
            run_handler_test_case(tc);
        }
    }

    #[test]
    fn test_handle_does_not_change_handler() {
        let (log, buf) = text_handler();
        let log1 = log.with_attrs(&[Attr::new("a", 1)]).unwrap();

        log1.log(Level::Info, "first", vec![Attr::new("a", 2), Attr::new("b", 3)])
            .unwrap();
        log1.log(Level::Info, "second", vec![]).unwrap();
        log.log(Level::Info, "third", vec![]).unwrap();

        assert_eq!(
            buf.contents(),
            "level=INFO msg=first a=2 b=3\nlevel=INFO msg=second a=1\nlevel=INFO msg=third\n"
        );
    }

    #[test]
    fn test_nested_groups() {
        let (log, buf) = json_handler();
        let log1 = log
            .with_group("request")
            .unwrap()
            .with_attrs(&[Attr::new("method", "GET")])
            .unwrap()
            .with_group("headers")
            .unwrap()
            .with_attrs(&[Attr::new("accept", "*/*")])
            .unwrap();

        log1.log(Level::Warn, "slow", vec![Attr::new("accept", "text/plain")])
            .unwrap();

        assert_eq!(
            buf.contents(),
            "{\"level\":\"WARN\",\"msg\":\"slow\",\"request\":{\"method\":\"GET\",\"headers\":{\"accept\":\"text/plain\"}}}\n"
        );
        assert_eq!(log1.path().to_string(), "request.headers");
    }

    #[test]
    fn test_disabled_levels_are_skipped() {
        let buf = SharedBuf::default();
        let sink: Arc<dyn Sink> = Arc::new(TextSink::new(buf.clone(), Level::Warn));
        let log = Meld::new(sink);

        assert!(!log.enabled(Level::Info));
        log.log(Level::Info, "quiet", vec![]).unwrap();
        log.log(Level::Error, "loud", vec![]).unwrap();

        assert_eq!(buf.contents(), "level=ERROR msg=loud\n");
    }

    #[test]
    fn test_handle_forwards_record_level() {
        let (log, buf) = text_handler();
        log.handle(&Record::new(Level::Debug, "raw")).unwrap();
        assert_eq!(buf.contents(), "level=DEBUG msg=raw\n");
    }

    #[test]
    fn test_handlers_shared_across_threads() {
        let (log, buf) = json_handler();
        let base = log.with_attrs(&[Attr::new("svc", "api")]).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let base = base.clone();
                thread::spawn(move || {
                    let worker = base.with_attrs(&[Attr::new("worker", i)]).unwrap();
                    worker.log(Level::Info, "tick", vec![]).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let out = buf.contents();
        let mut lines: Vec<&str> = out.lines().collect();
        lines.sort_unstable();
        let expected: Vec<String> = (0..4)
            .map(|i| format!(r#"{{"level":"INFO","msg":"tick","svc":"api","worker":{}}}"#, i))
            .collect();
        assert_eq!(lines, expected);
        assert_eq!(base.snapshot().render(), vec![Attr::new("svc", "api")]);
    }
}
