use super::core::PageSession;

#[test]
fn test_quad_center() {
    let quad = vec![0.0, 0.0, 100.0, 0.0, 100.0, 100.0, 0.0, 100.0];
    let (x, y) = PageSession::quad_center(&quad);
    assert_eq!(x, 50.0);
    assert_eq!(y, 50.0);
}

#[test]
fn test_quad_center_offset() {
    let quad = vec![10.0, 20.0, 30.0, 20.0, 30.0, 40.0, 10.0, 40.0];
    assert_eq!(PageSession::quad_center(&quad), (20.0, 30.0));
}

#[test]
fn test_quad_center_short_quad() {
    assert_eq!(PageSession::quad_center(&[1.0, 2.0]), (0.0, 0.0));
}
