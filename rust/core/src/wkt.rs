// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Well-Known Text geometry parser using nom
//!
//! Only polygons are decoded. Other geometry kinds are recognised so that a
//! row holding e.g. a `LINESTRING` can be kept with empty coordinates instead
//! of being rejected.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while},
    character::complete::{alpha1, char, digit1, one_of},
    combinator::{map, map_res, opt, recognize, value},
    multi::{many_m_n, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// Decoded polygon rings (2D; any Z/M ordinate is dropped)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub exterior: Vec<[f64; 2]>,
    pub interiors: Vec<Vec<[f64; 2]>>,
}

impl Polygon {
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }
}

/// Parsed WKT geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    /// Any other geometry kind, upper-cased (e.g. "LINESTRING")
    Other { kind: String },
}

impl Geometry {
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(p) => Some(p),
            Geometry::Other { .. } => None,
        }
    }

    /// Exterior ring of a polygon, empty for anything else
    pub fn exterior_coords(&self) -> Vec<[f64; 2]> {
        self.as_polygon()
            .map(|p| p.exterior.clone())
            .unwrap_or_default()
    }
}

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, ()> {
    map(take_while(|c: char| c.is_whitespace()), |_| ())(input)
}

/// Parse a number: 1, -1.5, .5, 3., 1e-3
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), opt(digit1))))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| fast_float::parse::<f64, _>(s),
    )(input)
}

/// Parse a coordinate tuple with 2 to 4 ordinates, keeping X and Y
fn point(input: &str) -> IResult<&str, [f64; 2]> {
    map(
        tuple((
            preceded(ws, number),
            preceded(ws, number),
            many_m_n(0, 2, preceded(ws, number)),
        )),
        |(x, y, _)| [x, y],
    )(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(ws, char(','), ws)(input)
}

/// Parse a ring: (x y, x y, ...)
fn ring(input: &str) -> IResult<&str, Vec<[f64; 2]>> {
    delimited(
        pair(ws, char('(')),
        separated_list1(comma, point),
        pair(ws, char(')')),
    )(input)
}

/// Parse the polygon body after the keyword
fn polygon_body(input: &str) -> IResult<&str, Polygon> {
    alt((
        value(Polygon::default(), preceded(ws, tag_no_case("EMPTY"))),
        map(
            delimited(
                pair(ws, char('(')),
                separated_list1(comma, ring),
                pair(ws, char(')')),
            ),
            |mut rings| {
                let exterior = rings.remove(0);
                Polygon {
                    exterior,
                    interiors: rings,
                }
            },
        ),
    ))(input)
}

/// Optional dimension marker: Z, M or ZM
fn dimension(input: &str) -> IResult<&str, Option<&str>> {
    opt(preceded(
        ws,
        alt((tag_no_case("ZM"), tag_no_case("Z"), tag_no_case("M"))),
    ))(input)
}

fn geometry(input: &str) -> IResult<&str, Geometry> {
    let (input, kind) = preceded(ws, alpha1)(input)?;
    let kind = kind.to_ascii_uppercase();

    if kind == "POLYGON" {
        let (input, _) = dimension(input)?;
        let (input, polygon) = polygon_body(input)?;
        let (input, _) = ws(input)?;
        Ok((input, Geometry::Polygon(polygon)))
    } else {
        // Body of non-polygon kinds is not decoded
        Ok(("", Geometry::Other { kind }))
    }
}

/// Parse a WKT string into a [`Geometry`]
///
/// The whole input must be consumed; trailing garbage is an error.
pub fn parse_geometry(input: &str) -> Result<Geometry> {
    match geometry(input) {
        Ok(("", geometry)) => Ok(geometry),
        Ok((remaining, _)) => Err(Error::wkt(
            input.len() - remaining.len(),
            "unexpected trailing input",
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::wkt(
            input.len() - e.input.len(),
            format!("{:?}", e.code),
        )),
        Err(nom::Err::Incomplete(_)) => Err(Error::wkt(input.len(), "incomplete input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_polygon() {
        let geom = parse_geometry("POLYGON ((0 0, 4 0, 4 3, 0 3, 0 0))").unwrap();
        let polygon = geom.as_polygon().unwrap();
        assert_eq!(polygon.exterior.len(), 5);
        assert_eq!(polygon.exterior[2], [4.0, 3.0]);
        assert!(polygon.interiors.is_empty());
    }

    #[test]
    fn test_parse_polygon_with_hole_and_z() {
        let geom = parse_geometry(
            "polygon z ((0 0 1, 10 0 1, 10 10 1, 0 10 1, 0 0 1), (2 2 1, 3 2 1, 3 3 1, 2 2 1))",
        )
        .unwrap();
        let polygon = geom.as_polygon().unwrap();
        assert_eq!(polygon.exterior.len(), 5);
        assert_eq!(polygon.interiors.len(), 1);
        assert_eq!(polygon.interiors[0][1], [3.0, 2.0]);
    }

    #[test]
    fn test_parse_number_formats() {
        let geom =
            parse_geometry("POLYGON((-1.5 .5,2. -3e-1,1E2 +4, -1.5 .5))").unwrap();
        let ext = geom.exterior_coords();
        assert_eq!(ext[0], [-1.5, 0.5]);
        assert_eq!(ext[1], [2.0, -0.3]);
        assert_eq!(ext[2], [100.0, 4.0]);
    }

    #[test]
    fn test_parse_empty_polygon() {
        let geom = parse_geometry("POLYGON EMPTY").unwrap();
        assert!(geom.as_polygon().unwrap().is_empty());
        assert!(geom.exterior_coords().is_empty());
    }

    #[test]
    fn test_other_geometry_kinds_are_recognised() {
        let geom = parse_geometry("LINESTRING (0 0, 1 1)").unwrap();
        assert_eq!(
            geom,
            Geometry::Other {
                kind: "LINESTRING".into()
            }
        );
        assert!(geom.exterior_coords().is_empty());
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert!(parse_geometry("POLYGON ((0 0, 1 0, 1 1)").is_err());
        assert!(parse_geometry("POLYGON ((0 0, 1))").is_err());
        assert!(parse_geometry("").is_err());

        match parse_geometry("POLYGON ((0 0, 1 0, 1 1)) trailing") {
            Err(Error::Wkt { offset, .. }) => assert_eq!(offset, 26),
            other => panic!("expected WKT error, got {:?}", other),
        }
    }
}
