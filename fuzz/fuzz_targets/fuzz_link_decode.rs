#![no_main]
use catch_core::{DecodePolicy, GameCfg, GameSession, LinkProtocol, RoundState};
use catch_traits::NavEvent;
use libfuzzer_sys::fuzz_target;

const NAV: [NavEvent; 5] = [
    NavEvent::North,
    NavEvent::South,
    NavEvent::East,
    NavEvent::West,
    NavEvent::Push,
];

fuzz_target!(|data: &[u8]| {
    let Some((&head, rest)) = data.split_first() else {
        return;
    };
    let policy = if head & 1 == 0 {
        DecodePolicy::Strict
    } else {
        DecodePolicy::Lenient
    };

    // Every strictly decoded message encodes back to the byte it came from.
    let proto = LinkProtocol::new(6, DecodePolicy::Strict);
    for &byte in rest {
        for state in [
            RoundState::Init,
            RoundState::Setup,
            RoundState::Playing,
            RoundState::Over,
        ] {
            if let Ok(msg) = proto.decode(byte, state) {
                assert_eq!(proto.encode(msg), byte);
            }
        }
    }

    // Arbitrary interleavings of input, received bytes and motion ticks
    // never panic and never move the ball off the grid.
    let cfg = GameCfg {
        decode: policy,
        ..GameCfg::default()
    };
    let Ok(mut session) = GameSession::new(cfg) else {
        return;
    };
    for &op in rest {
        match op >> 6 {
            0 => session.handle_nav(NAV[usize::from(op & 0x3F) % NAV.len()]),
            1 => {
                let _ = session.receive(op & 0x3F);
            }
            2 => {
                let _ = session.receive(0xF0 | (op & 1));
            }
            _ => {
                for _ in 0..=(op & 0x3F) {
                    session.motion_tick();
                }
            }
        }
        session.settle_link();
        while session.pop_outgoing().is_some() {}
        let _ = session.take_frame();
        let _ = session.take_tones();

        let grid = session.cfg().grid;
        assert!(session.ball().col() <= grid.max_col());
        assert!(session.ball().row() <= grid.max_row());
        assert!(session.paddle().row() < grid.max_row());
    }
});
