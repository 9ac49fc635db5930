#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, UartTx};
use log::info;

use noisefloor_core::config::SketchConfig;
use noisefloor_core::sink::SerialSink;
use noisefloor_core::sketch::NoiseSketch;
use noisefloor_firmware::microphone::Microphone;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    // Logs go over RTT, UART0 carries nothing but report lines.
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // noisefloor-core links `alloc`.
    esp_alloc::heap_allocator!(size: 8 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    let sketch_config = SketchConfig::DEFAULT;

    let uart = UartTx::new(
        peripherals.UART0,
        UartConfig::default().with_baudrate(sketch_config.baud_rate),
    )
    .expect("Failed to configure UART0")
    .with_tx(peripherals.GPIO43)
    .into_async();

    let microphone = Microphone::new(peripherals.ADC1, peripherals.GPIO1);

    info!(
        "Serial at {} baud, microphone on {}",
        sketch_config.baud_rate,
        sketch_config.channel_label()
    );

    NoiseSketch::new(
        sketch_config,
        microphone,
        embassy_time::Delay,
        SerialSink::new(uart),
    )
    .run()
    .await
}
