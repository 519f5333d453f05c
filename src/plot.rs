//! Static figures of recordings and connection weights, rendered as SVG.
use std::path::Path;

use itertools::{Itertools, MinMaxResult};
use nalgebra::DMatrix;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::SNNError;
use crate::recording::{summed_potential, VoltageTrace};

/// The size (in pixels) of every figure.
pub const FIGURE_SIZE: (u32, u32) = (1500, 1000);

/// Half height of a spike tick in a raster, relative to the spacing between two trains.
const TICK_HALF_HEIGHT: f64 = 0.4;

fn plot_err<E: std::fmt::Display>(e: E) -> SNNError {
    SNNError::PlotError(e.to_string())
}

/// Returns the smallest non-empty range containing all values.
fn value_range<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    match values.filter(|v| v.is_finite()).minmax() {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(v) => (v - 0.5, v + 0.5),
        MinMaxResult::MinMax(min, max) if min == max => (min - 0.5, max + 0.5),
        MinMaxResult::MinMax(min, max) => (min, max),
    }
}

/// Returns the range widened by 10% on each side.
fn with_margin((min, max): (f64, f64)) -> (f64, f64) {
    let margin = 0.1 * (max - min);
    (min - margin, max + margin)
}

fn draw_raster(
    area: &DrawingArea<SVGBackend, Shift>,
    trains: &[Vec<f64>],
    x_range: (f64, f64),
    x_desc: Option<&str>,
    y_desc: &str,
) -> Result<(), SNNError> {
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(
            x_range.0..x_range.1,
            -0.5..(trains.len().max(1) as f64 - 0.5),
        )
        .map_err(plot_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(y_desc);
    if let Some(x_desc) = x_desc {
        mesh.x_desc(x_desc);
    }
    mesh.draw().map_err(plot_err)?;

    chart
        .draw_series(trains.iter().enumerate().flat_map(|(i, times)| {
            let row = i as f64;
            times.iter().map(move |time| {
                PathElement::new(
                    vec![
                        (*time, row - TICK_HALF_HEIGHT),
                        (*time, row + TICK_HALF_HEIGHT),
                    ],
                    BLACK,
                )
            })
        }))
        .map_err(plot_err)?;

    Ok(())
}

fn draw_traces(
    area: &DrawingArea<SVGBackend, Shift>,
    times: &[f64],
    traces: &[&[f64]],
    x_range: (f64, f64),
    x_desc: Option<&str>,
) -> Result<(), SNNError> {
    let y_range = with_margin(value_range(
        traces.iter().flat_map(|trace| trace.iter().copied()),
    ));

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(plot_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc("V_m (mV)");
    if let Some(x_desc) = x_desc {
        mesh.x_desc(x_desc);
    }
    mesh.draw().map_err(plot_err)?;

    for (i, trace) in traces.iter().enumerate() {
        chart
            .draw_series(LineSeries::new(
                times.iter().copied().zip(trace.iter().copied()),
                &Palette99::pick(i),
            ))
            .map_err(plot_err)?;
    }

    Ok(())
}

/// Render the spike raster of a collection of spike trains, one row per train.
pub fn raster<P: AsRef<Path>>(trains: &[Vec<f64>], path: P) -> Result<(), SNNError> {
    let root = SVGBackend::new(path.as_ref(), FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let x_range = value_range(trains.iter().flatten().copied());
    draw_raster(&root, trains, x_range, Some("time (ms)"), "trial")?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render the spike rasters of an input and an output population, one above the other, with a shared time axis.
pub fn raster_pair<P: AsRef<Path>>(
    inputs: &[Vec<f64>],
    outputs: &[Vec<f64>],
    path: P,
) -> Result<(), SNNError> {
    let root = SVGBackend::new(path.as_ref(), FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let areas = root.split_evenly((2, 1));

    let x_range = value_range(inputs.iter().chain(outputs.iter()).flatten().copied());
    draw_raster(&areas[0], inputs, x_range, None, "input neuron")?;
    draw_raster(&areas[1], outputs, x_range, Some("time (ms)"), "output neuron")?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render a membrane potential trace above the spikes of the same neuron.
pub fn voltage_with_spikes<P: AsRef<Path>>(
    trace: &VoltageTrace,
    spikes: &[f64],
    path: P,
) -> Result<(), SNNError> {
    let root = SVGBackend::new(path.as_ref(), FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let areas = root.split_evenly((2, 1));

    let x_range = value_range(trace.times.iter().chain(spikes.iter()).copied());
    draw_traces(&areas[0], &trace.times, &[&trace.v_m[..]], x_range, None)?;
    draw_raster(
        &areas[1],
        &[spikes.to_vec()],
        x_range,
        Some("time (ms)"),
        "Spikes",
    )?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render the membrane potential traces of a group of neurons (top), and the trace of a single neuron
/// together with the summed potential of the group (bottom).
/// All traces must share the sampling times of the single neuron.
pub fn group_voltages<P: AsRef<Path>>(
    group: &[VoltageTrace],
    single: &VoltageTrace,
    rest_v: f64,
    path: P,
) -> Result<(), SNNError> {
    let summed = summed_potential(group, rest_v)?;
    if summed.len() != single.len() {
        return Err(SNNError::IncompatibleRecordings(format!(
            "The group traces have {} samples, the single trace has {}",
            summed.len(),
            single.len()
        )));
    }

    let root = SVGBackend::new(path.as_ref(), FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let areas = root.split_evenly((2, 1));

    let x_range = value_range(single.times.iter().copied());
    let group_traces: Vec<&[f64]> = group.iter().map(|trace| &trace.v_m[..]).collect();
    draw_traces(&areas[0], &single.times, &group_traces, x_range, None)?;
    draw_traces(
        &areas[1],
        &single.times,
        &[&single.v_m[..], &summed[..]],
        x_range,
        Some("time (ms)"),
    )?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render a weight matrix (one row per input neuron, one column per output neuron) as a heatmap.
pub fn weight_heatmap<P: AsRef<Path>>(weights: &DMatrix<f64>, path: P) -> Result<(), SNNError> {
    let (num_inputs, num_outputs) = weights.shape();

    let root = SVGBackend::new(path.as_ref(), FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(
            0.0..num_inputs.max(1) as f64,
            0.0..num_outputs.max(1) as f64,
        )
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Input Neuron ID")
        .y_desc("Output Neuron ID")
        .draw()
        .map_err(plot_err)?;

    let (min, max) = value_range(weights.iter().copied());
    chart
        .draw_series((0..num_inputs).flat_map(|i| {
            (0..num_outputs).map(move |j| {
                let level = (weights[(i, j)] - min) / (max - min);
                Rectangle::new(
                    [(i as f64, j as f64), (i as f64 + 1.0, j as f64 + 1.0)],
                    HSLColor(0.7 * (1.0 - level), 0.8, 0.5).filled(),
                )
            })
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
