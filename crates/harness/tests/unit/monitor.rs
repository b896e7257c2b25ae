//! Bus event monitor tests.

use proptest::prelude::*;

use cosim_core::model::{BusEvent, Dut, TcmDut};
use cosim_core::sim::monitor::{self, HostOutMonitor};

const FINISH: u32 = 0x1000;
const HOST_OUT: u32 = 0x2000;
const UART: u32 = 0x8000_0000;

fn posedge(dut: &mut TcmDut) {
    dut.set_clock(true);
    dut.eval();
}

fn negedge(dut: &mut TcmDut) {
    dut.set_clock(false);
    dut.eval();
}

#[test]
fn completion_is_level_triggered() {
    let mut dut = TcmDut::new(4096).with_script([BusEvent::write(FINISH, 1).held(3)]);

    for _ in 0..3 {
        posedge(&mut dut);
        assert!(monitor::is_finished(&dut, FINISH));
        negedge(&mut dut);
        // The bus holds its value between rising edges.
        assert!(monitor::is_finished(&dut, FINISH));
    }

    // Script exhausted: bus idles and the pattern disappears.
    posedge(&mut dut);
    assert!(!monitor::is_finished(&dut, FINISH));
}

#[test]
fn completion_requires_exact_pattern() {
    let mut dut = TcmDut::new(4096).with_script([
        BusEvent::write(FINISH, 2),
        BusEvent::write(FINISH + 4, 1),
        BusEvent {
            address: FINISH,
            data: 1,
            write: false,
            hold: 1,
        },
    ]);

    for _ in 0..3 {
        posedge(&mut dut);
        assert!(!monitor::is_finished(&dut, FINISH));
        negedge(&mut dut);
    }
}

#[test]
fn host_out_fires_once_for_a_held_write() {
    let mut dut = TcmDut::new(4096).with_script([BusEvent::write(HOST_OUT, 0x41).held(3)]);
    let mut host_out = HostOutMonitor::new();

    let mut bytes = Vec::new();
    for _ in 0..4 {
        posedge(&mut dut);
        bytes.extend(host_out.poll(&dut, HOST_OUT));
        negedge(&mut dut);
        bytes.extend(host_out.poll(&dut, HOST_OUT));
    }

    assert_eq!(bytes, vec![0x41]);
}

#[test]
fn host_out_rearms_after_request_drops() {
    let mut dut = TcmDut::new(4096).with_script([
        BusEvent::write(HOST_OUT, b'A' as u32).held(2),
        BusEvent::idle(1),
        BusEvent::write(HOST_OUT, b'B' as u32),
    ]);
    let mut host_out = HostOutMonitor::new();

    let mut bytes = Vec::new();
    for _ in 0..4 {
        posedge(&mut dut);
        bytes.extend(host_out.poll(&dut, HOST_OUT));
        negedge(&mut dut);
    }

    assert_eq!(bytes, vec![b'A', b'B']);
}

#[test]
fn host_out_ignores_zero_data() {
    let mut dut = TcmDut::new(4096).with_script([BusEvent::write(HOST_OUT, 0)]);
    let mut host_out = HostOutMonitor::new();

    posedge(&mut dut);
    assert_eq!(host_out.poll(&dut, HOST_OUT), None);
}

#[test]
fn uart_pacing_fires_only_while_clock_high_and_tx_idle() {
    let mut dut = TcmDut::new(4096).with_script([BusEvent::write(UART, b'Z' as u32)]);

    posedge(&mut dut);
    assert_eq!(monitor::uart_pacing(&dut, UART), Some(b'Z'));
    negedge(&mut dut);
    assert_eq!(monitor::uart_pacing(&dut, UART), None);

    let mut busy = TcmDut::new(4096).with_script([BusEvent::write(UART, b'Z' as u32)]);
    busy.set_tx_idle(false);
    posedge(&mut busy);
    assert_eq!(monitor::uart_pacing(&busy, UART), None);
}

proptest! {
    /// For any write-request waveform, the edge detector fires exactly once
    /// per deasserted-to-asserted transition.
    #[test]
    fn host_out_fires_once_per_rising_edge(waveform in prop::collection::vec(any::<bool>(), 1..64)) {
        let script: Vec<BusEvent> = waveform
            .iter()
            .map(|&asserted| {
                if asserted {
                    BusEvent::write(HOST_OUT, 1)
                } else {
                    BusEvent::idle(1)
                }
            })
            .collect();
        let mut dut = TcmDut::new(4096).with_script(script);
        let mut host_out = HostOutMonitor::new();

        let mut fires = 0;
        for _ in &waveform {
            posedge(&mut dut);
            if host_out.poll(&dut, HOST_OUT).is_some() {
                fires += 1;
            }
            negedge(&mut dut);
        }

        let mut expected = 0;
        let mut previous = false;
        for &asserted in &waveform {
            if asserted && !previous {
                expected += 1;
            }
            previous = asserted;
        }
        prop_assert_eq!(fires, expected);
    }
}
