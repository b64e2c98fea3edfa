//! Encode a bundle, frame it for a stream, and decode it again.

use oscwire::framing::{FrameConfig, read_packet, write_packet};
use oscwire::{Argument, Bundle, DecodeConfig, Message, Midi, Packet, TimeTag};
use std::io::Cursor;
use std::time::{Duration, SystemTime};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("OSC Round-Trip Example");
    println!("======================\n");

    let at = TimeTag::from_system_time(SystemTime::now() + Duration::from_millis(250));
    let bundle = Bundle::new(at)
        .element(
            Message::new("/synth/1/note")
                .arg(Midi::from_bytes(&[0x90, 60, 100])?)
                .arg(0.8_f32),
        )
        .element(
            Bundle::new(at)
                .element(Message::new("/fx/reverb").arg("hall").arg(true))
                .element(Message::new("/fx/eq").arg(vec![Argument::Float32(1.0), Argument::Nil])),
        );
    let packet = Packet::from(bundle);

    // Datagram form
    let encoded = packet.encode()?;
    println!("Encoded to {} bytes", encoded.len());

    // Stream form
    let mut wire = Vec::new();
    write_packet(&mut wire, &packet)?;
    println!("Framed to {} bytes", wire.len());

    let decoded = read_packet(
        &mut Cursor::new(wire),
        &FrameConfig::default(),
        &DecodeConfig::default(),
    )?;

    if let Packet::Bundle(bundle) = &decoded {
        for message in bundle.messages() {
            println!("{} {}", message.address, message.type_tags());
        }
    }

    assert_eq!(decoded, packet);
    println!("\nRound trip OK");

    Ok(())
}
