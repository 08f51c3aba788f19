use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Value, json};
use tether::bridge::{
    ChannelError, ChannelTarget, CommandDispatcher, InMemoryStore, WriterChannel,
};

struct SharedWriter(Rc<RefCell<Vec<u8>>>);

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn target() -> (
    Rc<RefCell<Vec<u8>>>,
    ChannelTarget<WriterChannel<SharedWriter>>,
) {
    let sink = Rc::new(RefCell::new(Vec::<u8>::new()));
    let store = Arc::new(InMemoryStore::new());
    let target = ChannelTarget::new(CommandDispatcher::new(store));
    (sink, target)
}

fn sent_bodies(sink: &Rc<RefCell<Vec<u8>>>) -> Vec<Value> {
    sink.borrow()
        .split(|b| *b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            let frame: Value = serde_json::from_slice(line).unwrap();
            assert_eq!(frame["type"], "event");
            serde_json::from_str(frame["commandOrEvent"].as_str().unwrap()).unwrap()
        })
        .collect()
}

fn send_value_frame(name: &str, encoded: &str) -> String {
    json!({
        "content": { "data": {
            "type": "command",
            "commandOrEvent": serde_json::to_string(&json!({
                "token": "1",
                "id": "aa",
                "commandType": "SendValue",
                "command": {
                    "name": name,
                    "formattedValue": { "mimeType": "application/json", "value": encoded }
                },
                "routingSlip": []
            })).unwrap()
        } }
    })
    .to_string()
}

#[test]
fn message_before_open_is_a_usage_error() {
    let (_, mut target) = target();

    let err = target.on_raw_message(&send_value_frame("x", "1")).unwrap_err();
    assert!(matches!(err, ChannelError::NotOpen));
    assert!(!target.is_open());
}

#[test]
fn open_emits_exactly_one_kernel_ready() {
    let (sink, mut target) = target();
    target
        .open(WriterChannel::new(SharedWriter(sink.clone())))
        .unwrap();

    let bodies = sent_bodies(&sink);
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({ "event": { "kernelInfos": [] }, "eventType": "KernelReady", "command": null })
    );
    assert!(target.is_open());
}

#[test]
fn replies_flow_back_through_the_open_channel() {
    let (sink, mut target) = target();
    target
        .open(WriterChannel::new(SharedWriter(sink.clone())))
        .unwrap();

    target.on_raw_message(&send_value_frame("x", "\"test\"")).unwrap();
    target.on_raw_message(&send_value_frame("y", "not json")).unwrap();

    let bodies = sent_bodies(&sink);
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0]["eventType"], "KernelReady");
    assert_eq!(bodies[1], json!({ "event": {}, "eventType": "CommandSucceeded", "command": null }));
    assert_eq!(bodies[2]["eventType"], "CommandFailed");
}

#[test]
fn serve_consumes_frames_line_by_line() {
    let (sink, mut target) = target();
    target
        .open(WriterChannel::new(SharedWriter(sink.clone())))
        .unwrap();

    let input = format!(
        "{}\n\n{}\n",
        send_value_frame("a", "1"),
        send_value_frame("b", "2")
    );
    target.serve(Cursor::new(input)).unwrap();

    let bodies = sent_bodies(&sink);
    // One ready plus one reply per non-empty line.
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[1]["eventType"], "CommandSucceeded");
    assert_eq!(bodies[2]["eventType"], "CommandSucceeded");
}
