use tone_core::spectrum::DEFAULT_FFT_SIZE;
use tone_core::{
    ColumnKey, DisplayRange, Engine, EngineState, MagnitudeSpectrum, NoteClass, Octave,
    OctaveVisibility, TuningSystemId, compute_strengths, normalize, sample_strength,
    tuning_system,
};

const SAMPLE_RATE: f32 = 44100.0;
const BINS: usize = DEFAULT_FFT_SIZE / 2;

fn silent() -> Vec<f32> {
    vec![f32::NEG_INFINITY; BINS]
}

fn bin_of(frequency: f32) -> usize {
    (frequency / (SAMPLE_RATE / 2.0 / BINS as f32)).round() as usize
}

#[test]
fn single_a4_peak() {
    let mut data = silent();
    data[20] = -40.0;

    assert_eq!(sample_strength(&data, SAMPLE_RATE, 440.0), -40.0);

    let spectrum = MagnitudeSpectrum::new(SAMPLE_RATE, data);
    let strengths = compute_strengths(tuning_system(TuningSystemId::EqualTemperament), &spectrum);
    let a = strengths.aggregate(NoteClass::A);
    assert!((a + 40.0).abs() < 1e-4, "got {a}");

    let intensity = normalize(a, -100.0, -35.0);
    assert!((intensity - 0.923).abs() < 1e-3);
}

#[test]
fn two_octaves_sum_in_power_domain() {
    let et = tuning_system(TuningSystemId::EqualTemperament);
    let mut data = silent();
    data[bin_of(et.frequency(NoteClass::E, Octave::new(5).unwrap()))] = -40.0;
    data[bin_of(et.frequency(NoteClass::E, Octave::new(6).unwrap()))] = -40.0;

    let strengths = compute_strengths(et, &MagnitudeSpectrum::new(SAMPLE_RATE, data));
    let e = strengths.aggregate(NoteClass::E);
    assert!((e - (-36.99)).abs() < 0.01, "got {e}");
    assert!(e > -40.0);
}

#[test]
fn silent_spectrum_gives_silent_aggregates() {
    let strengths = compute_strengths(
        tuning_system(TuningSystemId::Chakra),
        &MagnitudeSpectrum::new(SAMPLE_RATE, silent()),
    );
    for aggregate in strengths.aggregates() {
        assert_eq!(aggregate.decibels, f32::NEG_INFINITY);
    }
}

#[test]
fn sentinel_floor_is_silence() {
    let strengths = compute_strengths(
        tuning_system(TuningSystemId::EqualTemperament),
        &MagnitudeSpectrum::new(SAMPLE_RATE, vec![-300.0; BINS]),
    );
    assert!(strengths.aggregates().iter().all(|a| a.decibels == f32::NEG_INFINITY));
}

#[test]
fn low_sample_rate_saturates_high_octaves() {
    // Nyquist 4 kHz: octave 9 is out of range everywhere.
    let spectrum = MagnitudeSpectrum::new(8000.0, vec![-50.0; 256]);
    let strengths = compute_strengths(tuning_system(TuningSystemId::EqualTemperament), &spectrum);
    let o9 = Octave::new(9).unwrap();
    for note in NoteClass::ALL {
        assert_eq!(strengths.strength(note, o9), f32::NEG_INFINITY);
        assert!(strengths.aggregate(note).is_finite());
    }
}

#[test]
fn engine_draws_grid_for_visible_columns() {
    let mut engine = Engine::new(EngineState {
        tuning: TuningSystemId::EqualTemperament,
        range: DisplayRange::PRESETS[0],
        visibility: OctaveVisibility::default(),
    });
    let mut data = silent();
    data[20] = -40.0;
    let frame = engine.analyze(MagnitudeSpectrum::new(SAMPLE_RATE, data)).clone();

    let layout = frame.layout(350.0, 400.0);
    let bars = layout.bars(&frame);
    assert_eq!(bars.len(), 12 * 5);

    let a4 = bars
        .iter()
        .find(|b| b.note == NoteClass::A && b.key == ColumnKey::Octave(Octave::new(4).unwrap()))
        .unwrap();
    assert!((a4.intensity - 60.0 / 65.0).abs() < 1e-4);
    assert!((a4.height - a4.intensity * 30.0).abs() < 1e-4);
    assert!((a4.y + a4.height - (20.0 + 2.0 * 30.0 + 30.0)).abs() < 1e-3);
    assert_eq!(a4.width, 56.0);
    assert_eq!(a4.color, "#7986CB");
    assert_eq!(a4.label.text, "-40.0");

    let silent_bar = bars.iter().find(|b| b.note == NoteClass::C).unwrap();
    assert_eq!(silent_bar.height, 0.0);
    assert_eq!(silent_bar.label.text, "-inf");

    engine.set_visibility(OctaveVisibility::none());
    let empty = engine.frame().unwrap().layout(350.0, 400.0);
    assert!(empty.columns.is_empty());
    assert!(empty.bars(engine.frame().unwrap()).is_empty());
}
