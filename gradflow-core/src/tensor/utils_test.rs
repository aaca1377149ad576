use super::*;

#[test]
fn test_calculate_strides() {
    assert_eq!(calculate_strides(&[2, 3]), vec![3, 1]);
    assert_eq!(calculate_strides(&[2, 2, 2]), vec![4, 2, 1]);
    assert_eq!(calculate_strides(&[]), Vec::<usize>::new());
}

#[test]
fn test_broadcast_shapes() {
    assert_eq!(broadcast_shapes(&[2, 3], &[3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shapes(&[2, 1], &[1, 4]).unwrap(), vec![2, 4]);
    assert_eq!(broadcast_shapes(&[], &[5]).unwrap(), vec![5]);
    assert_eq!(broadcast_shapes(&[3, 1, 2], &[4, 1]).unwrap(), vec![3, 4, 2]);
}

#[test]
fn test_broadcast_shapes_incompatible() {
    let err = broadcast_shapes(&[2, 2], &[3]).unwrap_err();
    assert_eq!(
        err,
        GradFlowError::BroadcastError {
            shape1: vec![2, 2],
            shape2: vec![3]
        }
    );
}

#[test]
fn test_index_to_coord() {
    let shape = [2, 3];
    let strides = calculate_strides(&shape);
    assert_eq!(index_to_coord(0, &strides, &shape), vec![0, 0]);
    assert_eq!(index_to_coord(4, &strides, &shape), vec![1, 1]);
    assert_eq!(index_to_coord(5, &strides, &shape), vec![1, 2]);
}

#[test]
fn test_coord_to_index_broadcasted() {
    // [3] broadcast into [2, 3]
    let original_shape = [3];
    let original_strides = calculate_strides(&original_shape);
    assert_eq!(coord_to_index_broadcasted(&[1, 2], &original_shape, &original_strides), 2);
    // [2, 1] broadcast into [2, 3]
    let original_shape = [2, 1];
    let original_strides = calculate_strides(&original_shape);
    assert_eq!(coord_to_index_broadcasted(&[1, 2], &original_shape, &original_strides), 1);
}

#[test]
fn test_normalize_axes() {
    assert_eq!(normalize_axes(&[1, 0, 1], 2).unwrap(), vec![0, 1]);
    assert_eq!(
        normalize_axes(&[2], 2).unwrap_err(),
        GradFlowError::InvalidAxis { axis: 2, rank: 2 }
    );
}
