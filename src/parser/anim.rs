use std::io::BufRead;

use crate::error::MeshError;
use crate::math::Aabb;
use crate::model::{AnimationClip, JointPose};
use nalgebra_glm as glm;

/// One classified line of the animation format. `Unknown` is the explicit
/// skip branch for unrecognized prefixes and malformed payloads.
#[derive(Debug, Clone)]
enum AnimField {
    JointCount(usize),
    FrameCount(usize),
    FrameRate(f32),
    FrameSelect(usize),
    Bounds(Aabb),
    Joint { rotation: glm::Quat, translation: glm::Vec3 },
    Unknown,
}

fn floats<const N: usize>(tokens: &[&str]) -> Option<[f32; N]> {
    if tokens.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, tok) in out.iter_mut().zip(tokens) {
        *slot = tok.parse().ok()?;
    }
    Some(out)
}

fn classify(line: &str) -> AnimField {
    let mut tokens = line.split_whitespace();
    let Some(prefix) = tokens.next() else {
        return AnimField::Unknown;
    };
    let rest: Vec<&str> = tokens.collect();

    let field = match prefix {
        "bones" => rest.first().and_then(|t| t.parse().ok()).map(AnimField::JointCount),
        "frames" => rest.first().and_then(|t| t.parse().ok()).map(AnimField::FrameCount),
        "framerate" => rest.first().and_then(|t| t.parse().ok()).map(AnimField::FrameRate),
        "frame" => rest.first().and_then(|t| t.parse().ok()).map(AnimField::FrameSelect),
        "bbox" => floats::<6>(&rest).map(|[mnx, mny, mnz, mxx, mxy, mxz]| {
            AnimField::Bounds(Aabb::new(glm::vec3(mnx, mny, mnz), glm::vec3(mxx, mxy, mxz)))
        }),
        // jtr lines carry the quaternion as x y z w, then the translation.
        "jtr" => floats::<7>(&rest).map(|[qx, qy, qz, qw, tx, ty, tz]| AnimField::Joint {
            rotation: glm::Quat::new(qw, qx, qy, qz),
            translation: glm::vec3(tx, ty, tz),
        }),
        _ => None,
    };

    field.unwrap_or(AnimField::Unknown)
}

/// Parses the line-oriented animation format into a fresh clip.
///
/// `frames N` preallocates identity poses sized to the declared joint count;
/// each `frame` selector resets the joint cursor and subsequent `jtr` lines
/// fill that frame's pose arrays in encounter order. A clip with no frames or
/// a non-positive frame rate is rejected rather than left to divide by zero
/// during playback.
pub fn parse_anim(reader: impl BufRead) -> Result<AnimationClip, MeshError> {
    let mut joint_count = 0usize;
    let mut frames: Vec<JointPose> = Vec::new();
    let mut frame_rate = 0.0f32;
    let mut current: Option<usize> = None;
    let mut joint_cursor = 0usize;
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;
        match classify(&line) {
            AnimField::JointCount(count) => joint_count = count,
            AnimField::FrameCount(count) => {
                frames = vec![JointPose::identity(joint_count); count];
            }
            AnimField::FrameRate(rate) => frame_rate = rate,
            AnimField::FrameSelect(index) => {
                current = if index < frames.len() {
                    Some(index)
                } else {
                    log::warn!("frame selector {index} out of range, ignoring block");
                    None
                };
                joint_cursor = 0;
            }
            AnimField::Bounds(bounds) => {
                if let Some(frame) = current.and_then(|i| frames.get_mut(i)) {
                    frame.bounds = bounds;
                } else {
                    skipped += 1;
                }
            }
            AnimField::Joint { rotation, translation } => {
                match current.and_then(|i| frames.get_mut(i)) {
                    Some(frame) if joint_cursor < joint_count => {
                        frame.rotations[joint_cursor] = rotation;
                        frame.translations[joint_cursor] = translation;
                        joint_cursor += 1;
                    }
                    _ => skipped += 1,
                }
            }
            AnimField::Unknown => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("anim parse skipped {skipped} unrecognized or malformed lines");
    }

    if frames.is_empty() {
        return Err(MeshError::new("anim-empty"));
    }
    if frame_rate <= 0.0 {
        return Err(MeshError::new("anim-bad-framerate").with_arg("framerate", frame_rate));
    }

    Ok(AnimationClip { frames, frame_rate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_FRAMES: &str = "\
bones 2
frames 2
framerate 30
frame 0
bbox 0 0 0 1 1 1
jtr 0 0 0 1 0 0 0
jtr 0 0 0 1 1 0 0
frame 1
bbox 0 0 0 2 2 2
jtr 0 0 0.7071 0.7071 0 0 0
jtr 0 0 0 1 2 0 0
";

    #[test]
    fn clip_round_trip() {
        let clip = parse_anim(Cursor::new(TWO_FRAMES)).unwrap();
        assert_eq!(clip.frames.len(), 2);
        assert_eq!(clip.joint_count(), 2);
        assert!((clip.frame_rate - 30.0).abs() < 1e-6);
        assert!((clip.duration() - 2.0 / 30.0).abs() < 1e-9);

        // Every frame carries the same joint count.
        for frame in &clip.frames {
            assert_eq!(frame.rotations.len(), 2);
            assert_eq!(frame.translations.len(), 2);
        }

        assert_eq!(clip.frames[0].translations[1], glm::vec3(1.0, 0.0, 0.0));
        assert_eq!(clip.frames[1].translations[1], glm::vec3(2.0, 0.0, 0.0));
        assert_eq!(clip.frames[1].bounds.max(), glm::vec3(2.0, 2.0, 2.0));
    }

    #[test]
    fn frame_selector_resets_joint_cursor() {
        let clip = parse_anim(Cursor::new(TWO_FRAMES)).unwrap();
        // First jtr after "frame 1" landed on joint 0, not joint 2.
        let q = clip.frames[1].rotations[0];
        assert!((q.k - 0.7071).abs() < 1e-4);
    }

    #[test]
    fn surplus_joint_lines_are_dropped() {
        let text = "bones 1\nframes 1\nframerate 10\nframe 0\njtr 0 0 0 1 0 0 0\njtr 0 0 0 1 9 9 9\n";
        let clip = parse_anim(Cursor::new(text)).unwrap();
        assert_eq!(clip.joint_count(), 1);
        assert_eq!(clip.frames[0].translations[0], glm::vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn empty_clip_is_rejected() {
        let err = parse_anim(Cursor::new("bones 2\nframerate 30\n")).unwrap_err();
        assert_eq!(err.key, "anim-empty");
    }

    #[test]
    fn non_positive_framerate_is_rejected() {
        let text = "bones 1\nframes 1\nframerate 0\nframe 0\njtr 0 0 0 1 0 0 0\n";
        let err = parse_anim(Cursor::new(text)).unwrap_err();
        assert_eq!(err.key, "anim-bad-framerate");
    }

    #[test]
    fn unknown_lines_are_skipped() {
        let text = "bones 1\nglitter 7\nframes 1\nframerate 24\nframe 0\njtr 0 0 0 1 0 0 0\n";
        let clip = parse_anim(Cursor::new(text)).unwrap();
        assert_eq!(clip.frames.len(), 1);
    }
}
